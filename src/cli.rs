//! Command-line interface definitions for Guardian News.
//!
//! Every option can also be provided through an environment variable, which
//! is the only configuration source the application reads.

use crate::guardian::{self, DEFAULT_ENDPOINT};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command-line arguments for the Guardian News application.
///
/// # Examples
///
/// ```sh
/// # Latest culture and politics stories with the public test key
/// guardian_news
///
/// # Browse sport interactively with your own key
/// GUARDIAN_API_KEY=... guardian_news --section sport -i
///
/// # Also keep a JSON snapshot of the load
/// guardian_news -j ./out/stories.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search endpoint of the content API
    #[arg(long, env = "GUARDIAN_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Content API key
    #[arg(long, env = "GUARDIAN_API_KEY", default_value = "test", hide_env_values = true)]
    pub api_key: String,

    /// Section filter; use `|` to combine sections
    #[arg(long, env = "GUARDIAN_SECTION", default_value = "culture|politics")]
    pub section: String,

    /// Result order
    #[arg(long, default_value = "newest")]
    pub order_by: String,

    /// Write the loaded stories to this JSON file
    #[arg(short, long)]
    pub json_output: Option<PathBuf>,

    /// Keep running and read commands from stdin (r, l, <n>, q)
    #[arg(short, long)]
    pub interactive: bool,

    /// Command used to open stories, e.g. "firefox --new-tab"
    #[arg(long, env = "BROWSER")]
    pub browser: Option<String>,
}

impl Cli {
    /// The full search URL for these arguments.
    pub fn request_url(&self) -> Result<Url, url::ParseError> {
        guardian::request_url(&self.endpoint, &self.api_key, &self.section, &self.order_by)
    }
}

//! # Guardian News
//!
//! Fetches the newest stories for a section filter from the Guardian content
//! API and lists them in the terminal. Stories can be opened in the browser
//! and the list refreshed on demand.
//!
//! ## Usage
//!
//! ```sh
//! guardian_news --section "culture|politics" -i
//! ```
//!
//! ## Architecture
//!
//! 1. **Request**: build the search URL from the CLI arguments
//! 2. **Connectivity**: resolve the API host; offline means no load at all
//! 3. **Loading**: run the blocking fetch-and-parse pipeline on tokio's
//!    blocking pool, replacing the list wholesale when it finishes
//! 4. **Output**: print the list (or its empty state), optionally write a
//!    JSON snapshot, and in interactive mode take commands from stdin

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod error;
mod guardian;
mod models;
mod outputs;
mod session;
mod utils;

use cli::Cli;
use outputs::json;
use outputs::terminal::{LOADING, render_list};
use session::{FetchFn, Session};
use utils::{has_connectivity, redact_api_key};

const HELP: &str = "Commands: <n> open story n, r refresh, l list, q quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.section, ?args.json_output, interactive = args.interactive, "Parsed CLI arguments");

    let request_url = args.request_url()?.to_string();
    info!(url = %redact_api_key(&request_url), "guardian_news starting up");

    let fetch: FetchFn = Arc::new(api::fetch_story_data);
    let mut session = Session::new(request_url.as_str(), fetch, args.browser.clone());

    let connected = has_connectivity(&request_url).await;
    if session.start(connected) {
        eprintln!("{LOADING}");
        if let Some(stories) = session.wait_loaded().await {
            session.on_loaded(stories);
            write_snapshot(&session, args.json_output.as_deref()).await;
        }
    }
    print!("{}", render_list(session.list()));

    if args.interactive {
        interactive(&mut session, args.json_output.as_deref()).await?;
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, stories = session.list().len(), "Execution complete");
    Ok(())
}

/// Read commands from stdin until `q` or end of input.
///
/// Loads run in the background; a refresh issued while one is in flight
/// supersedes it.
async fn interactive(session: &mut Session, json_output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "q" | "quit" => break,
                    "r" | "refresh" => {
                        session.refresh();
                        eprintln!("{LOADING}");
                    }
                    "" | "l" | "list" => print!("{}", render_list(session.list())),
                    other => match other.parse::<usize>() {
                        Ok(n) if n >= 1 => {
                            if let Err(e) = session.select(n - 1).await {
                                error!(position = n, error = %e, "Failed to open story in browser");
                            }
                        }
                        _ => println!("{HELP}"),
                    },
                }
            }
            Some(stories) = session.wait_loaded(), if session.list().is_loading() => {
                session.on_loaded(stories);
                print!("{}", render_list(session.list()));
                write_snapshot(session, json_output).await;
            }
        }
    }
    Ok(())
}

async fn write_snapshot(session: &Session, json_output: Option<&Path>) {
    let Some(path) = json_output else { return };
    if let Err(e) = json::write_stories(session.list().stories(), path).await {
        error!(path = %path.display(), error = %e, "Failed to write story JSON");
    }
}

//! JSON snapshots of a load.
//!
//! The file holds a [`StoryPage`]: the local date and time of the write and
//! the stories in API order. Parent directories are created as needed and an
//! existing file is overwritten.

use crate::models::{Story, StoryPage};
use chrono::Local;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `stories` to `path` as a pretty-printed [`StoryPage`].
///
/// # Errors
///
/// Returns an error if serialization, directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = stories.len()))]
pub async fn write_stories(stories: &[Story], path: &Path) -> Result<(), Box<dyn Error>> {
    let now = Local::now();
    let page = StoryPage {
        local_date: now.date_naive().to_string(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        stories: stories.to_vec(),
    };
    let json = serde_json::to_string_pretty(&page)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!("Wrote story JSON");
    Ok(())
}

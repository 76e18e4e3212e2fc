//! Data models for Guardian stories.
//!
//! - [`Story`]: one article summary as returned by the content API search
//! - [`StoryPage`]: a timestamped snapshot of one load, written as JSON

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single story from the Guardian content API.
///
/// Every field is optional: a key missing from the API response leaves the
/// field unset. Fields are private so a `Story` cannot change after it has
/// been built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Story {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl Story {
    /// Build a story from its four optional parts.
    ///
    /// # Arguments
    ///
    /// * `title` - The headline (`webTitle`)
    /// * `section` - The section label (`sectionName`)
    /// * `publication_date` - The raw timestamp string (`webPublicationDate`)
    /// * `url` - The link to the full article (`webUrl`)
    pub fn new(
        title: Option<String>,
        section: Option<String>,
        publication_date: Option<String>,
        url: Option<String>,
    ) -> Self {
        Self {
            title,
            section,
            publication_date,
            url,
        }
    }

    /// The headline of the story.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The section the story belongs to.
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// The publication timestamp exactly as the API sent it.
    pub fn publication_date(&self) -> Option<&str> {
        self.publication_date.as_deref()
    }

    /// The website URL with the full story.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The publication date reformatted for display.
    ///
    /// RFC 3339 timestamps are converted to UTC and rendered as
    /// `YYYY-MM-DD HH:MM:SS`, so an offset such as `+05:00` shifts the time
    /// rather than being dropped. Anything else has its
    /// `T` separator replaced by a space and a trailing `Z` stripped.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // "2023-01-01T10:00:00Z" -> "2023-01-01 10:00:00"
    /// // "2023-01-01T15:00:00+05:00" -> "2023-01-01 10:00:00"
    /// // "2023-01-01T10:00Z"    -> "2023-01-01 10:00"
    /// ```
    pub fn display_date(&self) -> Option<String> {
        let raw = self.publication_date()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(
                parsed
                    .with_timezone(&Utc)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
            Err(_) => Some(raw.trim_end_matches('Z').replacen('T', " ", 1)),
        }
    }
}

/// A snapshot of the stories from one load.
///
/// Written by [`crate::outputs::json::write_stories`] so a load can be
/// inspected or diffed later.
#[derive(Debug, Deserialize, Serialize)]
pub struct StoryPage {
    /// The local date of the load in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The local time of the load in `HH:MM:SS` format.
    pub local_time: String,
    /// The stories in API order.
    pub stories: Vec<Story>,
}

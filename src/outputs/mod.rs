//! Output generation for loaded stories.
//!
//! # Submodules
//!
//! - [`terminal`]: Renders the story list (or its empty state) as plain text
//! - [`json`]: Writes a [`crate::models::StoryPage`] snapshot to disk

pub mod json;
pub mod terminal;

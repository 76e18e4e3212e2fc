//! The presentation side: story list state, background loading and selection.
//!
//! [`StoryLoader`] keeps the blocking pipeline off the async task that drives
//! the terminal. Every load gets a generation number; when a refresh restarts
//! the loader, results of older generations are thrown away on arrival, so
//! the list is only ever replaced by the latest request.

use crate::models::Story;
use crate::utils::open_in_browser;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Empty-state text when the connectivity check failed.
pub const NO_CONNECTION: &str = "No internet connection.";
/// Empty-state text when a load finished without stories.
pub const NO_STORIES: &str = "No stories found.";

/// The blocking fetch run by the loader, usually [`crate::api::fetch_story_data`].
pub type FetchFn = Arc<dyn Fn(&str) -> Vec<Story> + Send + Sync>;

/// What the list view shows: the stories, an empty-state message and
/// whether the loading indicator is visible.
#[derive(Debug, Default)]
pub struct StoryList {
    stories: Vec<Story>,
    empty_state: Option<String>,
    loading: bool,
}

impl StoryList {
    /// Drop every story currently shown.
    pub fn clear(&mut self) {
        self.stories.clear();
    }

    /// Replace the shown stories with `stories`. Nothing is merged.
    pub fn replace_all(&mut self, stories: Vec<Story>) {
        self.clear();
        self.stories.extend(stories);
    }

    pub fn get(&self, index: usize) -> Option<&Story> {
        self.stories.get(index)
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn empty_state(&self) -> Option<&str> {
        self.empty_state.as_deref()
    }

    pub fn set_empty_state(&mut self, message: impl Into<String>) {
        self.empty_state = Some(message.into());
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

/// Runs the fetch on tokio's blocking pool and reports the newest result.
pub struct StoryLoader {
    request_url: Arc<str>,
    fetch: FetchFn,
    generation: u64,
    tx: mpsc::UnboundedSender<(u64, Vec<Story>)>,
    rx: mpsc::UnboundedReceiver<(u64, Vec<Story>)>,
}

impl StoryLoader {
    pub fn new(request_url: impl Into<Arc<str>>, fetch: FetchFn) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            request_url: request_url.into(),
            fetch,
            generation: 0,
            tx,
            rx,
        }
    }

    /// The generation of the most recent load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new load, superseding any load still in flight.
    ///
    /// The superseded fetch keeps running until it completes or times out;
    /// only its result is ignored.
    ///
    /// Must be called from within a tokio runtime.
    pub fn restart(&mut self) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let request_url = Arc::clone(&self.request_url);
        let fetch = Arc::clone(&self.fetch);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let stories = match tokio::task::spawn_blocking(move || fetch(request_url.as_ref())).await {
                Ok(stories) => stories,
                Err(e) => {
                    error!(generation, error = %e, "Story loader task failed");
                    Vec::new()
                }
            };
            // The receiver lives as long as the loader; a send error only
            // means the session is gone.
            let _ = tx.send((generation, stories));
        });
        debug!(generation, "Started story load");
        generation
    }

    /// Wait for the result of the current generation.
    ///
    /// Cancel-safe: results are only consumed from the channel one at a time.
    pub async fn finished(&mut self) -> Option<Vec<Story>> {
        while let Some((generation, stories)) = self.rx.recv().await {
            if generation == self.generation {
                return Some(stories);
            }
            debug!(
                generation,
                current = self.generation,
                count = stories.len(),
                "Discarding superseded load"
            );
        }
        None
    }
}

/// Ties the list view to the loader and the browser.
pub struct Session {
    list: StoryList,
    loader: StoryLoader,
    browser: Option<String>,
}

impl Session {
    /// # Arguments
    ///
    /// * `request_url` - Fully built search URL handed to every fetch
    /// * `fetch` - The blocking pipeline
    /// * `browser` - Optional browser command line for [`Session::select`]
    pub fn new(request_url: impl Into<Arc<str>>, fetch: FetchFn, browser: Option<String>) -> Self {
        Self {
            list: StoryList::default(),
            loader: StoryLoader::new(request_url, fetch),
            browser,
        }
    }

    pub fn list(&self) -> &StoryList {
        &self.list
    }

    /// Initial load, gated on connectivity.
    ///
    /// Returns `true` when a load was started. Offline, the loading indicator
    /// is hidden and the empty state explains why the list stays empty.
    pub fn start(&mut self, connected: bool) -> bool {
        if connected {
            self.list.set_loading(true);
            self.loader.restart();
            true
        } else {
            info!("No network connection; not loading stories");
            self.list.set_loading(false);
            self.list.set_empty_state(NO_CONNECTION);
            false
        }
    }

    /// Manual refresh: show the loading indicator and load again.
    pub fn refresh(&mut self) {
        self.list.set_loading(true);
        let generation = self.loader.restart();
        info!(generation, "Refreshing stories");
    }

    /// Wait until the latest load finishes.
    pub async fn wait_loaded(&mut self) -> Option<Vec<Story>> {
        self.loader.finished().await
    }

    /// Show the result of a finished load.
    pub fn on_loaded(&mut self, stories: Vec<Story>) {
        self.list.set_loading(false);
        info!(count = stories.len(), generation = self.loader.generation(), "Stories loaded");
        self.list.replace_all(stories);
        if self.list.is_empty() {
            self.list.set_empty_state(NO_STORIES);
        }
    }

    /// Open the story at `index` in the browser.
    ///
    /// An index past the end or a story without a URL is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser command fails.
    #[instrument(level = "info", skip(self))]
    pub async fn select(&self, index: usize) -> Result<(), Box<dyn Error>> {
        let Some(story) = self.list.get(index) else {
            warn!(len = self.list.len(), "No story at this position");
            return Ok(());
        };
        let Some(url) = story.url() else {
            warn!(title = ?story.title(), "Story has no URL to open");
            return Ok(());
        };
        open_in_browser(url, self.browser.as_deref()).await?;
        Ok(())
    }
}

//! Blocking fetch-and-parse pipeline for the Guardian content API.
//!
//! One call performs URL validation, a single HTTP GET and the JSON parse, in
//! that order, on the calling thread. Every failure is logged and recovered:
//! callers always get a (possibly empty or partial) list of stories back.
//!
//! # Architecture
//!
//! - [`Transport`]: opens one GET connection for a URL
//! - [`Connection`]: status code plus the readable response body
//! - [`HttpTransport`]: an async `reqwest` client driven by its own
//!   current-thread runtime, so connect and read timeouts are enforced separately
//! - [`fetch_with`]: the pipeline over any transport, returning a [`FetchReport`]
//! - [`fetch_story_data`]: the pipeline over [`HttpTransport`], returning only
//!   the stories
//!
//! # Threading
//!
//! Everything here blocks for up to the configured timeouts. Async callers
//! must run it on a blocking pool (`tokio::task::spawn_blocking`); see
//! [`crate::session::StoryLoader`].

use crate::error::FetchError;
use crate::guardian::extract_stories;
use crate::models::Story;
use crate::utils::redact_api_key;
use std::error::Error as _;
use std::io::{self, Cursor, Read};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// An open GET connection. The response body is read through [`Read`].
///
/// Dropping the connection releases it together with its body stream.
pub trait Connection: Read {
    /// The HTTP status code of the response.
    fn status_code(&self) -> u16;
}

/// Something that can open a GET connection for a URL.
///
/// Each call opens an independent connection; implementors hold no state that
/// is shared between requests.
pub trait Transport {
    /// The connection type handed back by [`Transport::open`].
    type Conn: Connection;

    /// Send a GET request to `url` and return the connection once the response
    /// head has arrived.
    fn open(&self, url: &Url) -> io::Result<Self::Conn>;
}

/// Connect and read timeouts for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_millis(15_000),
            read: Duration::from_millis(10_000),
        }
    }
}

/// [`Transport`] backed by an async `reqwest` client.
///
/// Requests are driven to completion on a private current-thread runtime, so
/// calls block the calling thread. The transport must be built, used and
/// dropped outside of an async context.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    runtime: Arc<Runtime>,
}

impl HttpTransport {
    /// Build a client with the given timeouts.
    ///
    /// `connect` bounds the TCP/TLS handshake. `read` bounds every single read
    /// on the connection, including the wait for the response head, so a
    /// server that goes quiet for longer than `read` fails the request.
    pub fn new(timeouts: Timeouts) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = {
            let _guard = runtime.enter();
            reqwest::Client::builder()
                .connect_timeout(timeouts.connect)
                .read_timeout(timeouts.read)
                .pool_max_idle_per_host(0)
                .build()
                .map_err(io::Error::other)?
        };
        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }
}

impl Transport for HttpTransport {
    type Conn = HttpConnection;

    fn open(&self, url: &Url) -> io::Result<HttpConnection> {
        let response = self
            .runtime
            .block_on(self.client.get(url.clone()).send())
            .map_err(into_io_error)?;
        Ok(HttpConnection {
            response,
            runtime: Arc::clone(&self.runtime),
            chunk: Cursor::default(),
        })
    }
}

/// Response of an [`HttpTransport`] request; the body is pulled chunk by
/// chunk on the transport's runtime.
pub struct HttpConnection {
    response: reqwest::Response,
    runtime: Arc<Runtime>,
    chunk: Cursor<Vec<u8>>,
}

impl Read for HttpConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.chunk.read(buf)?;
            if n > 0 || buf.is_empty() {
                return Ok(n);
            }
            match self.runtime.block_on(self.response.chunk()) {
                Ok(Some(bytes)) => self.chunk = Cursor::new(bytes.to_vec()),
                Ok(None) => return Ok(0),
                Err(e) => return Err(into_io_error(e)),
            }
        }
    }
}

impl Connection for HttpConnection {
    fn status_code(&self) -> u16 {
        self.response.status().as_u16()
    }
}

/// Map a `reqwest` error to I/O, keeping timeouts recognizable as
/// [`io::ErrorKind::TimedOut`].
fn into_io_error(e: reqwest::Error) -> io::Error {
    let timed_out = e.is_timeout()
        || std::iter::successors(e.source(), |&cause| cause.source()).any(|cause| {
            cause
                .downcast_ref::<io::Error>()
                .is_some_and(|err| err.kind() == io::ErrorKind::TimedOut)
        });
    let kind = if timed_out {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    io::Error::new(kind, e)
}

/// Outcome of one pipeline run.
///
/// `stories` holds everything that could be parsed, in response order.
/// `failure` is the first failure that stopped the pipeline, if any.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub stories: Vec<Story>,
    pub failure: Option<FetchError>,
}

impl FetchReport {
    fn failed(failure: FetchError) -> Self {
        Self {
            stories: Vec::new(),
            failure: Some(failure),
        }
    }
}

/// Query the Guardian API and return the stories it lists.
///
/// This is the list-only view of [`fetch_story_report`]: failures are logged
/// and degrade to an empty or partial list.
pub fn fetch_story_data(request_url: &str) -> Vec<Story> {
    let report = fetch_story_report(request_url);
    if let Some(failure) = &report.failure {
        warn!(
            stage = failure.stage(),
            error = %failure,
            kept = report.stories.len(),
            "Story fetch failed; returning what was parsed"
        );
    }
    report.stories
}

/// Run the pipeline over a fresh [`HttpTransport`] with default timeouts.
pub fn fetch_story_report(request_url: &str) -> FetchReport {
    match HttpTransport::new(Timeouts::default()) {
        Ok(transport) => fetch_with(&transport, request_url),
        Err(e) => {
            error!(error = %e, "Problem building the HTTP client");
            FetchReport::failed(FetchError::Network(e))
        }
    }
}

/// Run the pipeline over any [`Transport`].
///
/// # Arguments
///
/// * `transport` - Opens the GET connection
/// * `request_url` - Absolute `http`/`https` URL including all query parameters
///
/// # Returns
///
/// A [`FetchReport`]. A malformed URL never reaches the transport.
#[instrument(level = "info", skip_all, fields(url = %redact_api_key(request_url)))]
pub fn fetch_with<T: Transport>(transport: &T, request_url: &str) -> FetchReport {
    let url = match create_url(request_url) {
        Ok(url) => url,
        Err(e) => return FetchReport::failed(e),
    };

    let body = match make_http_request(transport, &url) {
        Ok(body) => body,
        Err(e) => return FetchReport::failed(e),
    };

    let report = extract_stories(&body);
    info!(
        count = report.stories.len(),
        complete = report.failure.is_none(),
        "Fetched stories"
    );
    report
}

fn create_url(request_url: &str) -> Result<Url, FetchError> {
    let reason = match Url::parse(request_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => return Ok(url),
        Ok(url) => format!("unsupported scheme `{}`", url.scheme()),
        Err(e) => e.to_string(),
    };
    error!(%reason, "Problem building the URL");
    Err(FetchError::MalformedUrl {
        url: redact_api_key(request_url),
        reason,
    })
}

/// GET `url` and read the whole body when the status is 200.
///
/// The connection lives only inside this function, so it is released exactly
/// once on every return path.
fn make_http_request<T: Transport>(transport: &T, url: &Url) -> Result<String, FetchError> {
    let mut conn = transport.open(url).map_err(|e| {
        error!(error = %e, kind = ?e.kind(), "Problem making the HTTP request");
        FetchError::Network(e)
    })?;

    let status = conn.status_code();
    if status != 200 {
        error!(status, "Error response code");
        return Err(FetchError::Status(status));
    }

    let mut bytes = Vec::new();
    conn.read_to_end(&mut bytes).map_err(|e| {
        error!(error = %e, "Problem retrieving the story JSON results");
        FetchError::Network(e)
    })?;
    debug!(bytes = bytes.len(), "Read response body");

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

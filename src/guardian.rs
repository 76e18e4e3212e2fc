//! Guardian content API: request URLs and response parsing.
//!
//! The search endpoint answers with
//!
//! ```text
//! { "response": { "results": [ { "sectionName": .., "webPublicationDate": ..,
//!                                "webTitle": .., "webUrl": .. }, .. ] } }
//! ```
//!
//! and every leaf is treated as optional.

use crate::api::FetchReport;
use crate::error::FetchError;
use crate::models::Story;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument};
use url::Url;

/// Search endpoint of the Guardian content API.
pub const DEFAULT_ENDPOINT: &str = "https://content.guardianapis.com/search";

const KEY_RESPONSE: &str = "response";
const KEY_RESULTS: &str = "results";
const KEY_SECTION: &str = "sectionName";
const KEY_DATE: &str = "webPublicationDate";
const KEY_TITLE: &str = "webTitle";
const KEY_WEB_URL: &str = "webUrl";

/// Build the search URL for a section filter.
///
/// Query parameters are appended in the order `api-key`, `section`,
/// `order-by`, and their values are percent-encoded.
///
/// # Errors
///
/// Returns an error if `endpoint` is not an absolute URL.
pub fn request_url(
    endpoint: &str,
    api_key: &str,
    section: &str,
    order_by: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .append_pair("api-key", api_key)
        .append_pair("section", section)
        .append_pair("order-by", order_by);
    Ok(url)
}

/// Parse a search response body into stories.
///
/// An empty body is the "no data" case and yields no stories and no failure.
/// When the body cannot be parsed, the stories built before the failure are
/// kept and the failure is recorded in the report.
#[instrument(level = "debug", skip_all, fields(bytes = body.len()))]
pub fn extract_stories(body: &str) -> FetchReport {
    if body.trim().is_empty() {
        debug!("Empty response body; no stories");
        return FetchReport::default();
    }

    let mut stories = Vec::new();
    let failure = match parse_into(body, &mut stories) {
        Ok(()) => None,
        Err(e) => {
            error!(error = %e, parsed = stories.len(), "Problem parsing the story JSON results");
            Some(e)
        }
    };
    debug!(count = stories.len(), "Extracted stories");
    FetchReport { stories, failure }
}

fn parse_into(body: &str, stories: &mut Vec<Story>) -> Result<(), FetchError> {
    let root: Value = serde_json::from_str(body)?;
    let results = root
        .get(KEY_RESPONSE)
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::Shape(format!("missing object `{KEY_RESPONSE}`")))?
        .get(KEY_RESULTS)
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Shape(format!("missing array `{KEY_RESULTS}`")))?;

    for (index, element) in results.iter().enumerate() {
        let article = element.as_object().ok_or_else(|| {
            FetchError::Shape(format!("result {index} is {}, not an object", kind(element)))
        })?;
        stories.push(Story::new(
            field(article, KEY_TITLE),
            field(article, KEY_SECTION),
            field(article, KEY_DATE),
            field(article, KEY_WEB_URL),
        ));
    }
    Ok(())
}

/// Read one optional leaf as text.
///
/// Strings are taken as they are. Any other non-null value, nested arrays and
/// objects included, is kept as its compact JSON text.
fn field(article: &Map<String, Value>, key: &str) -> Option<String> {
    match article.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Helpers for logging, connectivity checks and launching the browser.

use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument, warn};
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (backing off to a char boundary) with
/// an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Render a request URL for the logs with the `api-key` value masked.
///
/// Strings that do not parse as URLs are only truncated.
pub fn redact_api_key(request_url: &str) -> String {
    let Ok(mut url) = Url::parse(request_url) else {
        return truncate_for_log(request_url, 120);
    };
    if !url.query_pairs().any(|(k, _)| k == "api-key") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api-key" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

/// Check whether the host of `request_url` can be resolved.
///
/// This is the gate in front of every load: no resolvable host means no
/// network, and the list shows the "no connection" message instead.
#[instrument(level = "debug", skip_all)]
pub async fn has_connectivity(request_url: &str) -> bool {
    let Ok(url) = Url::parse(request_url) else {
        return false;
    };
    let (Some(host), Some(port)) = (url.host_str(), url.port_or_known_default()) else {
        return false;
    };
    let found = match tokio::net::lookup_host((host, port)).await {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(e) => {
            warn!(%host, error = %e, "Host lookup failed; treating as offline");
            false
        }
    };
    found
}

/// Open `url` in an external browser.
///
/// `browser` is a command line such as `firefox --new-tab`; the URL is
/// appended as the last argument. Without one, the platform opener is used.
///
/// # Errors
///
/// Returns an error if the command cannot be spawned or exits unsuccessfully.
#[instrument(level = "info", skip(browser))]
pub async fn open_in_browser(url: &str, browser: Option<&str>) -> io::Result<()> {
    let mut command = match browser.map(str::split_whitespace) {
        Some(mut parts) => {
            let program = parts
                .next()
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty browser command"))?;
            let mut command = Command::new(program);
            command.args(parts);
            command
        }
        None if cfg!(target_os = "macos") => Command::new("open"),
        None if cfg!(windows) => {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]);
            command
        }
        None => Command::new("xdg-open"),
    };

    let status = command
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    debug!(%status, "Browser command finished");

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("browser command exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        assert_eq!(truncate_for_log("héllo", 2), "h…(+5 bytes)");
    }

    #[test]
    fn test_redact_api_key() {
        let url = "https://content.guardianapis.com/search?api-key=secret&section=culture%7Cpolitics&order-by=newest";
        let redacted = redact_api_key(url);
        assert!(!redacted.contains("secret"));
        assert_eq!(
            redacted,
            "https://content.guardianapis.com/search?api-key=***&section=culture%7Cpolitics&order-by=newest"
        );
    }

    #[test]
    fn test_redact_api_key_leaves_other_urls_alone() {
        assert_eq!(redact_api_key("https://x/a?b=c"), "https://x/a?b=c");
        assert_eq!(redact_api_key("not a url"), "not a url");
    }

    #[tokio::test]
    async fn test_has_connectivity_ip_literal() {
        assert!(has_connectivity("http://127.0.0.1:8080/search").await);
    }

    #[tokio::test]
    async fn test_has_connectivity_resolves_host_names() {
        assert!(has_connectivity("http://localhost:8080/search").await);
        assert!(has_connectivity("http://[::1]/search").await);
        assert!(!has_connectivity("https://no-such-host.invalid/search").await);
    }

    #[tokio::test]
    async fn test_has_connectivity_rejects_bad_url() {
        assert!(!has_connectivity("not a url").await);
        assert!(!has_connectivity("mailto:someone@example.com").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_open_in_browser_uses_given_command() {
        assert!(open_in_browser("https://x/a", Some("true")).await.is_ok());
        assert!(open_in_browser("https://x/a", Some("false")).await.is_err());
        assert!(open_in_browser("https://x/a", Some("   ")).await.is_err());
    }
}

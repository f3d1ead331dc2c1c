//! Maps a server URL and an `org/repo` identifier onto the job's API base URL.

use crate::jenkins::error::{FetchError, Result};
use url::Url;

/// Splits `org/repo` into its two segments, trimming surrounding whitespace.
///
/// Anything other than exactly one `/` with non-empty text on both sides is
/// rejected rather than producing a URL with a missing segment.
pub fn split_identifier(repo: &str) -> Result<(&str, &str)> {
    let mut parts = repo.split('/').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(org), Some(name), None) if !org.is_empty() && !name.is_empty() => Ok((org, name)),
        _ => Err(FetchError::IdentifierFormat(repo.to_string())),
    }
}

/// Parses `server_url` as an absolute http(s) base URL with trailing slashes
/// stripped. A query or fragment is rejected since the job path is appended
/// after it.
pub fn normalize_server_url(server_url: &str) -> Result<Url> {
    let invalid = |reason: String| FetchError::InvalidServerUrl {
        url: server_url.to_string(),
        reason,
    };
    let parsed =
        Url::parse(server_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(invalid("missing host".to_string())),
    }
    if parsed.query().is_some() {
        return Err(invalid("query string not allowed".to_string()));
    }
    if parsed.fragment().is_some() {
        return Err(invalid("fragment not allowed".to_string()));
    }
    Ok(parsed)
}

/// Returns `{server_url}/job/{org}/job/{repo}/` with both segments
/// percent-encoded.
pub fn resolve(server_url: &str, repo: &str) -> Result<String> {
    let mut url = normalize_server_url(server_url)?;
    let (org, name) = split_identifier(repo)?;
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: "cannot be used as a base URL".to_string(),
        })?
        .pop_if_empty()
        .extend(["job", org, "job", name, ""]);
    Ok(url.into())
}

/// URL of a single build under a resolved job URL.
pub fn build_url(job_url: &str, number: u64) -> String {
    format!("{job_url}{number}/")
}

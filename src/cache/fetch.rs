//! HTTP fetches for the download cache.
//!
//! libcurl never follows redirects on its own here: the Location target has
//! to be validated (absolute, http(s), optionally a trusted SPDX host)
//! before the one permitted hop. Conditional requests reuse the same
//! transfer setup with an `If-None-Match` header.

use crate::error::{Result, SpdxLibraryError};
use std::str;
use std::time::Duration;
use url::Url;

/// Connect and stall timeout applied to every transfer.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Hosts a restricted redirect may land on. SPDX reference data is served
/// from these domains; anything else is rejected so a poisoned redirect
/// cannot seed the cache.
pub(crate) const TRUSTED_REDIRECT_HOSTS: &[&str] =
    &["spdx.org", "spdx.dev", "spdx.com", "spdx.info"];

/// One transfer's worth of response.
pub(crate) struct HttpResponse {
    pub status: u32,
    pub etag: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

/// Fully resolved fetch: a final 200 body plus the ETag that came with it.
pub(crate) struct FetchedContent {
    pub etag: Option<String>,
    pub body: Vec<u8>,
}

fn is_redirect(status: u32) -> bool {
    matches!(status, 301 | 302 | 303)
}

/// GET `url`, following at most one validated redirect hop.
///
/// Any final status other than 200 is an error, including a second
/// redirect.
pub(crate) fn fetch(url: &Url, restrict_redirects: bool) -> Result<FetchedContent> {
    let mut response = perform(url, None)?;
    if is_redirect(response.status) {
        let target = redirect_target(url, &response, restrict_redirects)?;
        tracing::debug!(from = %url, to = %target, "following redirect");
        response = perform(&target, None)?;
        if response.status != 200 {
            return Err(SpdxLibraryError::HttpStatus {
                url: target.to_string(),
                status: response.status,
            });
        }
    } else if response.status != 200 {
        return Err(SpdxLibraryError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }
    Ok(FetchedContent {
        etag: response.etag,
        body: response.body,
    })
}

/// Conditional GET; only the status code matters to revalidation.
pub(crate) fn conditional_status(url: &Url, etag: &str) -> Result<u32> {
    let response = perform(url, Some(etag))?;
    Ok(response.status)
}

/// Validates the Location header of a redirect response.
fn redirect_target(url: &Url, response: &HttpResponse, restrict: bool) -> Result<Url> {
    let location = response
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| SpdxLibraryError::RedirectMissingLocation {
            url: url.to_string(),
        })?;
    let target = Url::parse(location).map_err(|e| SpdxLibraryError::RedirectTarget {
        target: location.to_string(),
        source: e,
    })?;
    if target.scheme() != "http" && target.scheme() != "https" {
        return Err(SpdxLibraryError::RedirectScheme {
            target: target.to_string(),
        });
    }
    if restrict {
        let host = target.host_str().unwrap_or_default();
        if !TRUSTED_REDIRECT_HOSTS.contains(&host) {
            return Err(SpdxLibraryError::RedirectUntrustedHost {
                host: host.to_string(),
            });
        }
    }
    Ok(target)
}

/// One curl transfer; redirects are not followed here.
fn perform(url: &Url, if_none_match: Option<&str>) -> Result<HttpResponse> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str())
        .map_err(|e| SpdxLibraryError::network(url, e))?;
    easy.follow_location(false)
        .map_err(|e| SpdxLibraryError::network(url, e))?;
    easy.connect_timeout(FETCH_TIMEOUT)
        .map_err(|e| SpdxLibraryError::network(url, e))?;
    // Stall guard standing in for a per-read timeout.
    easy.low_speed_limit(1)
        .map_err(|e| SpdxLibraryError::network(url, e))?;
    easy.low_speed_time(FETCH_TIMEOUT)
        .map_err(|e| SpdxLibraryError::network(url, e))?;

    if let Some(etag) = if_none_match {
        let mut headers = curl::easy::List::new();
        headers
            .append(&format!("If-None-Match: {}", etag))
            .map_err(|e| SpdxLibraryError::network(url, e))?;
        easy.http_headers(headers)
            .map_err(|e| SpdxLibraryError::network(url, e))?;
    }

    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    header_lines.push(line.trim_end().to_string());
                }
                true
            })
            .map_err(|e| SpdxLibraryError::network(url, e))?;
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(|e| SpdxLibraryError::network(url, e))?;
        transfer
            .perform()
            .map_err(|e| SpdxLibraryError::network(url, e))?;
    }
    let status = easy
        .response_code()
        .map_err(|e| SpdxLibraryError::network(url, e))?;

    let (etag, location) = parse_headers(&header_lines);
    Ok(HttpResponse {
        status,
        etag,
        location,
        body,
    })
}

/// Pulls ETag and Location out of raw header lines.
///
/// ETags are kept verbatim, quotes and weak prefix included, so later
/// conditional requests round-trip the origin's exact value.
fn parse_headers(lines: &[String]) -> (Option<String>, Option<String>) {
    let mut etag = None;
    let mut location = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("etag") {
                etag = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("location") {
                location = Some(value.to_string());
            }
        }
    }
    (etag, location)
}

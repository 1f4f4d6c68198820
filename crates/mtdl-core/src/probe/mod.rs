//! HTTP HEAD / metadata probing.
//!
//! Uses the curl crate (libcurl) to fetch response headers and learn the
//! total size (`Content-Length`) and whether byte ranges are honored
//! (`Accept-Ranges: bytes`). No body is transferred.

mod parse;

use std::str;

use crate::curl_opts::CurlOptions;
use crate::error::DownloadError;

/// Headers of interest from the final HEAD response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct HeadInfo {
    pub content_length: Option<u64>,
    pub accept_ranges: bool,
}

/// What the probe learned about the remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// Total size in bytes; always > 0.
    pub total_size: u64,
    /// True if the server advertised `Accept-Ranges: bytes`.
    pub range_supported: bool,
}

/// Performs a HEAD request and returns size and range capability.
///
/// Transport failures and non-2xx responses are `Probe` errors; a missing or
/// zero `Content-Length` is a `Size` error.
pub fn probe(url: &str, opts: &CurlOptions) -> Result<ProbeResult, DownloadError> {
    let probe_err = |reason: String| DownloadError::Probe {
        url: url.to_string(),
        reason,
    };
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)
        .map_err(|e| probe_err(format!("invalid URL: {}", e)))?;
    easy.nobody(true).map_err(|e| probe_err(e.to_string()))?;
    opts.apply(&mut easy).map_err(|e| probe_err(e.to_string()))?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(|e| probe_err(e.to_string()))?;
        transfer
            .perform()
            .map_err(|e| probe_err(format!("HEAD request failed: {}", e)))?;
    }

    let code = easy
        .response_code()
        .map_err(|e| probe_err(format!("no response code: {}", e)))?;
    if !(200..300).contains(&code) {
        return Err(probe_err(format!("HEAD returned HTTP {}", code)));
    }

    let info = parse::parse_headers(&headers);
    tracing::debug!(
        url,
        content_length = ?info.content_length,
        accept_ranges = info.accept_ranges,
        "probe complete"
    );
    to_result(info)
}

fn to_result(info: HeadInfo) -> Result<ProbeResult, DownloadError> {
    match info.content_length {
        Some(n) if n > 0 => Ok(ProbeResult {
            total_size: n,
            range_supported: info.accept_ranges,
        }),
        Some(_) => Err(DownloadError::Size(
            "server reported Content-Length: 0".to_string(),
        )),
        None => Err(DownloadError::Size(
            "server did not report a Content-Length".to_string(),
        )),
    }
}

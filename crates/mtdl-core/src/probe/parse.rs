//! Parse HTTP response header lines into HeadInfo.

use super::HeadInfo;

/// Parse collected header lines into HeadInfo.
///
/// With redirects followed, curl hands over the headers of every response in
/// order; each `HTTP/` status line starts a fresh response, so only the last
/// one is reflected in the result.
pub(crate) fn parse_headers(lines: &[String]) -> HeadInfo {
    let mut info = HeadInfo::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.get(..5).map_or(false, |p| p.eq_ignore_ascii_case("http/")) {
            info = HeadInfo::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                info.content_length = value.parse::<u64>().ok();
            }
            if name.eq_ignore_ascii_case("accept-ranges") {
                info.accept_ranges = value
                    .split(',')
                    .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"));
            }
        }
    }

    info
}

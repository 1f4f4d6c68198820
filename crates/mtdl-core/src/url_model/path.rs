//! Filename extraction from URL path.

/// Extracts the last non-empty path segment of a URL (query and fragment ignored).
///
/// Strings that do not parse as a URL are treated as a bare path, the way a
/// user might type `host/dir/file.bin`.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().rsplit('/').find(|s| !s.is_empty())?.to_string(),
        Err(_) => {
            let path = url.split(|c| c == '?' || c == '#').next().unwrap_or("");
            let (_, last) = path.rsplit_once('/')?;
            last.to_string()
        }
    };
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}

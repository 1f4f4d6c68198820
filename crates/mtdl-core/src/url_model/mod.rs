//! Output filename derivation from the URL.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Derives a local filename from the last path segment of `url`, sanitized for
/// Linux. Falls back to `fallback` when the URL yields nothing usable.
///
/// - `derive_filename("https://example.com/archive.zip", "downloaded_file")` → `"archive.zip"`
/// - `derive_filename("https://example.com/", "downloaded_file")` → `"downloaded_file"`
pub fn derive_filename(url: &str, fallback: &str) -> String {
    filename_from_url_path(url)
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| !s.is_empty() && s != "." && s != "..")
        .unwrap_or_else(|| fallback.to_string())
}

//! Linux-safe filename sanitization.

/// Linux NAME_MAX in bytes.
const NAME_MAX: usize = 255;

/// Makes a URL-derived name safe to create in the current directory.
///
/// Separators, NUL, whitespace and control characters become `_` (runs collapse
/// to one); leading/trailing dots, spaces and underscores are trimmed; the result
/// is cut to NAME_MAX bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let bad = matches!(c, '/' | '\\') || c.is_control() || c.is_whitespace();
        if !bad {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches(|c| matches!(c, '.' | '_' | ' '));
    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}

//! Markup stripping for rendered URLs.

/// Removes `<...>` tags from a rendered URL.
///
/// An unterminated `<` drops everything after it. Text between tags is kept.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match (in_tag, c) {
            (false, '<') => in_tag = true,
            (true, '>') => in_tag = false,
            (false, _) => out.push(c),
            (true, _) => {}
        }
    }
    out
}

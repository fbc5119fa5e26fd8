//! Path separator normalization.

const EMBEDDED_SCHEME: &str = "http://";

/// Collapses runs of `/` to one and turns runs of `\` into `/`.
///
/// A run of two or more slashes directly in front of `http://` is reduced to
/// `//` rather than `/`, so `/proxy//http://x` keeps its double slash. The
/// slashes inside the embedded `http://` are an ordinary run and collapse.
/// Applying this twice to such a path is not a no-op.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(c) = rest.chars().next() {
        if c == '/' {
            let run = rest.bytes().take_while(|&b| b == b'/').count();
            rest = &rest[run..];
            if run >= 2 && rest.starts_with(EMBEDDED_SCHEME) {
                out.push_str("//");
            } else {
                out.push('/');
            }
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    collapse_backslashes(&out)
}

fn collapse_backslashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_backslash = false;
    for c in path.chars() {
        if c == '\\' {
            if !prev_backslash {
                out.push('/');
            }
            prev_backslash = true;
        } else {
            out.push(c);
            prev_backslash = false;
        }
    }
    out
}

/// Joins two path fragments and normalizes the result.
pub fn join_paths(head: &str, tail: &str) -> String {
    normalize_path(&format!("{head}{tail}"))
}

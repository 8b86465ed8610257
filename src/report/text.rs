// src/report/text.rs

//! Text helpers shared by the report renderers.

/// Cut `s` to at most `max_bytes` bytes of UTF-8 without splitting a
/// character. The result is always a prefix of `s`.
pub fn unicode_truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Prefix every non-blank line with four spaces (a markdown code block).
pub fn indent4(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for line in s.split_inclusive('\n') {
        if !line.trim().is_empty() {
            out.push_str("    ");
        }
        out.push_str(line);
    }
    out
}

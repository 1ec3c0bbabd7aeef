//! Output escaping and scalar coercion.
//!
//! Every string interpolated into block markup goes through one of these.

/// Escape text for use inside a double- or single-quoted HTML attribute.
pub fn esc_attr(s: &str) -> String {
    html_escape(s)
}

/// Escape text for use as HTML element content.
pub fn esc_html(s: &str) -> String {
    html_escape(s)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Coerce an untrusted scalar to a non-negative integer.
///
/// Leading whitespace and an optional `+` are skipped, then the longest run
/// of ASCII digits is read. Anything else (absence, no digits, a leading `-`)
/// is `0`. Values past `u64::MAX` saturate.
pub fn intval(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);

    s.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        })
}

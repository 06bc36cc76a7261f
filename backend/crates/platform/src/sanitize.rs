//! Input sanitizing and output escaping

/// Escape text for safe inclusion in HTML
///
/// Escapes `& < > " ' /` (OWASP rule #1 set).
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Trim and strip control characters other than newline and tab
pub fn sanitize_input(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect();
    kept.trim().to_string()
}

/// Like [`sanitize_input`], but single-line: newlines and tabs become spaces
pub fn sanitize_line(input: &str) -> String {
    sanitize_input(input)
        .chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .collect()
}

/// Escape HTML special characters, leaving existing entities untouched.
///
/// Only `&`, `<`, `>`, `"` and `'` are encoded. Other characters, including
/// non-ASCII ones that have named entities, pass through as UTF-8.
pub fn e(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for (index, ch) in value.char_indices() {
        match ch {
            '&' if is_entity(&value[index..]) => escaped.push('&'),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Check if `rest` starts with `&name;`, `&#123;` or `&#x1F;`
fn is_entity(rest: &str) -> bool {
    let Some(end) = rest.find(';') else {
        return false;
    };
    let body = &rest[1..end];

    if let Some(numeric) = body.strip_prefix('#') {
        return match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit()),
        };
    }

    let mut chars = body.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

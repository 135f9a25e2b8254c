//! Text rendering of SQLite values.

use rusqlite::types::ValueRef;

/// Renders a column value the way the console prints it.
///
/// `NULL` becomes `null`, numbers use their decimal form, text is passed
/// through (invalid UTF-8 is replaced), and blobs are written as `\x`
/// followed by lowercase hex.
pub fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "null".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format!("\\x{}", hex::encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_storage_class() {
        assert_eq!(render_value(ValueRef::Null), "null");
        assert_eq!(render_value(ValueRef::Integer(-42)), "-42");
        assert_eq!(render_value(ValueRef::Real(3.25)), "3.25");
        assert_eq!(render_value(ValueRef::Text(b"Latte")), "Latte");
        assert_eq!(render_value(ValueRef::Blob(&[0xde, 0xad, 0x01])), "\\xdead01");
    }

    #[test]
    fn replaces_invalid_utf8_in_text() {
        let rendered = render_value(ValueRef::Text(&[b'a', 0xff, b'b']));
        assert_eq!(rendered, "a\u{fffd}b");
    }
}

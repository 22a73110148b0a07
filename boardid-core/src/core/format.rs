//! Rendering of raw identifiers into printable form.

/// An identifier as produced by a strategy, before formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawId {
    /// Already human-readable (a MAC address string, an ASCII serial).
    Text(String),
    /// Binary serial or digest bytes; rendered as lowercase hex.
    Binary(Vec<u8>),
}

impl RawId {
    /// Renders the identifier: text passes through, bytes become two
    /// lowercase hex characters each, high nibble first.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Binary(bytes) => hex::encode(bytes),
        }
    }

    /// Renders the identifier and keeps only its last `digits` characters.
    #[must_use]
    pub fn format(&self, digits: Option<usize>) -> String {
        let rendered = self.render();
        match digits {
            Some(digits) => last_chars(&rendered, digits).to_string(),
            None => rendered,
        }
    }
}

/// Returns the trailing `count` characters of `s`, or all of `s` if it is shorter.
pub fn last_chars(s: &str, count: usize) -> &str {
    let total = s.chars().count();
    if count >= total {
        return s;
    }
    match s.char_indices().nth(total - count) {
        Some((index, _)) => &s[index..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_is_lowercase_hex() {
        let id = RawId::Binary(vec![0x01, 0x23, 0xab, 0xcd, 0xef, 0x00]);
        assert_eq!(id.render(), "0123abcdef00");
    }

    #[test]
    fn test_text_passes_through() {
        let id = RawId::Text("ABC123".to_string());
        assert_eq!(id.render(), "ABC123");
    }

    #[test]
    fn test_digits_keep_trailing_characters() {
        let id = RawId::Text("0000000012345678".to_string());
        assert_eq!(id.format(Some(4)), "5678");
        assert_eq!(id.format(None), "0000000012345678");
    }

    #[test]
    fn test_digits_never_pad() {
        let id = RawId::Text("abc".to_string());
        assert_eq!(id.format(Some(3)), "abc");
        assert_eq!(id.format(Some(10)), "abc");
    }

    #[test]
    fn test_digits_apply_to_hex_rendering() {
        let id = RawId::Binary(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(id.format(Some(3)), "eef");
    }

    #[test]
    fn test_last_chars_law() {
        let raw = "0123456789";
        for d in 1..=15 {
            let out = last_chars(raw, d);
            assert_eq!(out.len(), d.min(raw.len()));
            assert!(raw.ends_with(out));
        }
    }

    #[test]
    fn test_last_chars_respects_char_boundaries() {
        assert_eq!(last_chars("aé1", 2), "é1");
    }
}

/// Character-set decoding for the two text encodings used inside a `.doc`
/// piece: a single-byte encoding for "compressed" pieces, and UTF-16LE for
/// everything else.
use encoding_rs::WINDOWS_1252;

/// Single-byte character set used to decode compressed pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    /// Direct byte-to-codepoint mapping (ISO-8859-1). Always succeeds: every
    /// byte 0x00-0xFF maps to the identically numbered Unicode codepoint.
    Latin1,
    /// Windows-1252, routed through `encoding_rs`. Differs from Latin1 only in
    /// the 0x80-0x9F range, where Windows-1252 places printable characters
    /// (curly quotes, the euro sign, etc.) that Latin1 leaves as control codes.
    Windows1252,
}

impl Default for CharacterSet {
    fn default() -> Self {
        CharacterSet::Latin1
    }
}

/// Decode a single-byte-encoded piece according to `charset`.
pub fn decode_single_byte(bytes: &[u8], charset: CharacterSet) -> String {
    match charset {
        CharacterSet::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        CharacterSet::Windows1252 => {
            let (text, _encoding, _had_errors) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Decode a UTF-16LE-encoded piece, substituting U+FFFD for unpaired surrogates
/// and any trailing odd byte.
pub fn decode_utf16_le(bytes: &[u8]) -> String {
    let even_len = bytes.len() & !1;
    let units: Vec<u16> = bytes[..even_len]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_direct_mapping() {
        let decoded = decode_single_byte(&[0x41, 0xE9], CharacterSet::Latin1);
        assert_eq!(decoded, "A\u{E9}");
    }

    #[test]
    fn test_windows_1252_curly_quote() {
        let decoded = decode_single_byte(&[0x93, 0x94], CharacterSet::Windows1252);
        assert_eq!(decoded, "\u{201C}\u{201D}");
    }

    #[test]
    fn test_utf16_le_basic() {
        let bytes: Vec<u8> = "Hi".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        assert_eq!(decode_utf16_le(&bytes), "Hi");
    }

    #[test]
    fn test_utf16_le_odd_trailing_byte_is_dropped() {
        let mut bytes: Vec<u8> = "A".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        bytes.push(0xFF);
        assert_eq!(decode_utf16_le(&bytes), "A");
    }

    #[test]
    fn test_utf16_le_unpaired_surrogate_is_replaced() {
        let bytes = 0xD800u16.to_le_bytes();
        assert_eq!(decode_utf16_le(&bytes), "\u{FFFD}");
    }
}

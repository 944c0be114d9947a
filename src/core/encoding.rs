//! XML Encoding Detection and Line Decoding
//!
//! Handles detection of UTF-16 and UTF-8 based on BOM and leading byte patterns,
//! finds line terminators on code-unit boundaries, and decodes one line at a time.
//! Anything without a UTF-16 signature is read as UTF-8.

use memchr::memchr2_iter;

use crate::error::DecodeError;

/// Detect the encoding of XML input based on BOM or byte patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

/// Bytes needed to tell the encodings apart
pub const SNIFF_LEN: usize = 3;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        if input.len() < 2 {
            return XmlEncoding::Utf8;
        }

        match (input[0], input[1]) {
            (0xFF, 0xFE) => XmlEncoding::Utf16Le,
            (0xFE, 0xFF) => XmlEncoding::Utf16Be,
            // No BOM - '<' next to a null byte
            (0x00, b'<') => XmlEncoding::Utf16Be,
            (b'<', 0x00) => XmlEncoding::Utf16Le,
            _ => XmlEncoding::Utf8,
        }
    }

    /// Length of the byte order mark at the start of `input`, if any
    pub fn bom_len(self, input: &[u8]) -> usize {
        let bom: &[u8] = match self {
            XmlEncoding::Utf8 => &UTF8_BOM,
            XmlEncoding::Utf16Le => &UTF16_LE_BOM,
            XmlEncoding::Utf16Be => &UTF16_BE_BOM,
        };
        if input.starts_with(bom) {
            bom.len()
        } else {
            0
        }
    }

    /// Width of one code unit in bytes
    #[inline]
    pub fn unit_len(self) -> usize {
        match self {
            XmlEncoding::Utf8 => 1,
            XmlEncoding::Utf16Le | XmlEncoding::Utf16Be => 2,
        }
    }

    /// Find the next `\n` or `\r` code unit at or after `from`.
    ///
    /// `from` must sit on a code-unit boundary. Returns the byte offset of the
    /// terminator; the terminator itself is `unit_len()` bytes wide.
    pub fn find_line_end(self, bytes: &[u8], from: usize) -> Option<usize> {
        let tail = bytes.get(from..)?;
        match self {
            XmlEncoding::Utf8 => memchr2_iter(b'\n', b'\r', tail).next().map(|i| from + i),
            // Low byte first: terminator byte on an even offset, null after it
            XmlEncoding::Utf16Le => memchr2_iter(b'\n', b'\r', tail)
                .find(|&i| i % 2 == 0 && tail.get(i + 1) == Some(&0))
                .map(|i| from + i),
            // High byte first: null on an even offset, terminator byte after it
            XmlEncoding::Utf16Be => memchr2_iter(b'\n', b'\r', tail)
                .find(|&i| i % 2 == 1 && tail[i - 1] == 0)
                .map(|i| from + i - 1),
        }
    }

    /// Whether the terminator code unit starting at `bytes[0]` is `\r`
    #[inline]
    pub fn is_carriage_return(self, bytes: &[u8]) -> bool {
        match self {
            XmlEncoding::Utf8 => bytes.first() == Some(&b'\r'),
            XmlEncoding::Utf16Le => bytes.starts_with(&[b'\r', 0]),
            XmlEncoding::Utf16Be => bytes.starts_with(&[0, b'\r']),
        }
    }

    /// Decode one line into `out`, replacing its previous contents.
    ///
    /// Decoding is strict: malformed input is reported, never replaced.
    pub fn decode_into(self, bytes: &[u8], line: usize, out: &mut String) -> Result<(), DecodeError> {
        out.clear();
        match self {
            XmlEncoding::Utf8 => {
                let text = std::str::from_utf8(bytes).map_err(|e| self.error(line, e.to_string()))?;
                out.push_str(text);
                Ok(())
            }
            XmlEncoding::Utf16Le | XmlEncoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(self.error(line, "odd number of bytes".to_string()));
                }
                let big_endian = self == XmlEncoding::Utf16Be;
                let units = bytes.chunks_exact(2).map(|chunk| {
                    if big_endian {
                        u16::from_be_bytes([chunk[0], chunk[1]])
                    } else {
                        u16::from_le_bytes([chunk[0], chunk[1]])
                    }
                });
                for ch in char::decode_utf16(units) {
                    let ch = ch.map_err(|e| self.error(line, e.to_string()))?;
                    out.push(ch);
                }
                Ok(())
            }
        }
    }

    fn error(self, line: usize, reason: String) -> DecodeError {
        DecodeError {
            encoding: self,
            line,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_le(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn utf16_be(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(u16::to_be_bytes).collect()
    }

    #[test]
    fn test_detect_utf8() {
        assert_eq!(XmlEncoding::detect(b"<root/>"), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(b"<?xml"), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::detect(b""), XmlEncoding::Utf8);
    }

    #[test]
    fn test_detect_utf8_bom() {
        let input = [0xEF, 0xBB, 0xBF, b'<'];
        assert_eq!(XmlEncoding::detect(&input), XmlEncoding::Utf8);
        assert_eq!(XmlEncoding::Utf8.bom_len(&input), 3);
        assert_eq!(XmlEncoding::Utf8.bom_len(b"<r/>"), 0);
    }

    #[test]
    fn test_detect_utf16_le_bom() {
        let input = [0xFF, 0xFE, b'<', 0x00];
        assert_eq!(XmlEncoding::detect(&input), XmlEncoding::Utf16Le);
        assert_eq!(XmlEncoding::Utf16Le.bom_len(&input), 2);
    }

    #[test]
    fn test_detect_utf16_be_bom() {
        assert_eq!(XmlEncoding::detect(&[0xFE, 0xFF, 0x00, b'<']), XmlEncoding::Utf16Be);
    }

    #[test]
    fn test_detect_utf16_without_bom() {
        assert_eq!(XmlEncoding::detect(&utf16_le("<r/>")), XmlEncoding::Utf16Le);
        assert_eq!(XmlEncoding::detect(&utf16_be("<r/>")), XmlEncoding::Utf16Be);
    }

    #[test]
    fn test_find_line_end_utf8() {
        let bytes = b"ab\ncd\r\nef";
        assert_eq!(XmlEncoding::Utf8.find_line_end(bytes, 0), Some(2));
        assert_eq!(XmlEncoding::Utf8.find_line_end(bytes, 3), Some(5));
        assert_eq!(XmlEncoding::Utf8.find_line_end(bytes, 7), None);
        assert_eq!(XmlEncoding::Utf8.find_line_end(bytes, 42), None);
    }

    #[test]
    fn test_find_line_end_utf16() {
        let le = utf16_le("a\nb");
        assert_eq!(XmlEncoding::Utf16Le.find_line_end(&le, 0), Some(2));
        let be = utf16_be("a\rb");
        assert_eq!(XmlEncoding::Utf16Be.find_line_end(&be, 0), Some(2));
    }

    #[test]
    fn test_find_line_end_utf16_ignores_misaligned_bytes() {
        // U+0A41 encodes as 41 0A in LE; the 0x0A byte is not a terminator
        let le = utf16_le("\u{0A41}x");
        assert_eq!(XmlEncoding::Utf16Le.find_line_end(&le, 0), None);
        // U+0D00 encodes as 0D 00 in BE; the 0x0D byte is not a terminator either
        let be = utf16_be("\u{0D00}x");
        assert_eq!(XmlEncoding::Utf16Be.find_line_end(&be, 0), None);
    }

    #[test]
    fn test_is_carriage_return() {
        assert!(XmlEncoding::Utf8.is_carriage_return(b"\r\n"));
        assert!(!XmlEncoding::Utf8.is_carriage_return(b"\n"));
        assert!(XmlEncoding::Utf16Le.is_carriage_return(&utf16_le("\r")));
        assert!(XmlEncoding::Utf16Be.is_carriage_return(&utf16_be("\r")));
        assert!(!XmlEncoding::Utf16Be.is_carriage_return(&utf16_be("\n")));
    }

    #[test]
    fn test_decode_utf8() {
        let mut out = String::from("stale");
        XmlEncoding::Utf8.decode_into("<é/>".as_bytes(), 1, &mut out).unwrap();
        assert_eq!(out, "<é/>");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut out = String::new();
        let err = XmlEncoding::Utf8.decode_into(&[b'<', 0xC3, 0x28], 4, &mut out).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.encoding, XmlEncoding::Utf8);
    }

    #[test]
    fn test_decode_utf16() {
        let mut out = String::new();
        XmlEncoding::Utf16Le.decode_into(&utf16_le("<r/>"), 1, &mut out).unwrap();
        assert_eq!(out, "<r/>");
        XmlEncoding::Utf16Be.decode_into(&utf16_be("<r/>"), 1, &mut out).unwrap();
        assert_eq!(out, "<r/>");
    }

    #[test]
    fn test_decode_utf16_rejects_odd_length_and_lone_surrogate() {
        let mut out = String::new();
        assert!(XmlEncoding::Utf16Le.decode_into(&[b'<', 0x00, b'r'], 1, &mut out).is_err());
        assert!(XmlEncoding::Utf16Le.decode_into(&[0x00, 0xD8, b'r', 0x00], 1, &mut out).is_err());
    }
}

//! Sample payload type and sanitization.

use std::fmt;

/// Number of payload bytes read from the device per poll cycle.
pub const SAMPLE_LEN: usize = 16;

/// One sanitized device reading.
///
/// A sample always carries exactly [`SAMPLE_LEN`] bytes of printable
/// ASCII; presence or absence of data is expressed by `Option<Sample>`
/// in the slot, not by a sentinel inside the payload. This keeps a
/// reading that originally contained NUL bytes distinct from "no data".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample([u8; SAMPLE_LEN]);

impl Sample {
    /// Build a sample from one raw device read.
    ///
    /// Bytes in the printable ASCII range `0x20..0x7f` pass through;
    /// everything else is replaced with `'.'`.
    pub fn sanitize(raw: [u8; SAMPLE_LEN]) -> Self {
        let mut bytes = raw;
        for b in &mut bytes {
            if !(0x20..0x7f).contains(b) {
                *b = b'.';
            }
        }
        Self(bytes)
    }

    /// The payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes. Always [`SAMPLE_LEN`].
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for slice-like call sites.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sanitization guarantees printable ASCII.
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0x41, b'A' ; "uppercase letter passes")]
    #[test_case(0x20, b' ' ; "space is lowest printable")]
    #[test_case(0x7e, b'~' ; "tilde is highest printable")]
    #[test_case(0x1f, b'.' ; "below printable range replaced")]
    #[test_case(0x7f, b'.' ; "delete replaced")]
    #[test_case(0x00, b'.' ; "nul replaced")]
    #[test_case(0xff, b'.' ; "high bit replaced")]
    fn sanitize_byte(raw: u8, want: u8) {
        let mut bytes = [b'x'; SAMPLE_LEN];
        bytes[5] = raw;
        let sample = Sample::sanitize(bytes);
        assert_eq!(sample.as_bytes()[5], want);
    }

    #[test]
    fn sanitize_mixed_payload() {
        let raw = *b"AB\x00D\x7fF GHIJKLM\xffP";
        let sample = Sample::sanitize(raw);
        assert_eq!(sample.as_bytes(), &b"AB.D.F GHIJKLM.P"[..]);
    }

    #[test]
    fn display_is_payload_text() {
        let sample = Sample::sanitize(*b"ABCDEFGHIJKLMNOP");
        assert_eq!(sample.to_string(), "ABCDEFGHIJKLMNOP");
        assert_eq!(sample.len(), SAMPLE_LEN);
    }
}

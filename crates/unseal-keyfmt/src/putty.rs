//! PuTTY `.ppk` heuristic

use std::sync::LazyLock;

use regex::bytes::Regex;

static PRIVATE_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Private-Lines: [0-9]+").expect("valid Private-Lines pattern"));

/// True if the blob contains a `Private-Lines: <digits>` header line.
///
/// The match is not anchored and the blob need not be UTF-8.
pub fn is_putty_key(blob: &[u8]) -> bool {
    PRIVATE_LINES.is_match(blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches() {
        assert!(is_putty_key(b"Private-Lines: 5"));
        assert!(is_putty_key(b"Comment: x\r\nPrivate-Lines: 14\r\n"));
    }

    #[test]
    fn header_needs_digits() {
        assert!(!is_putty_key(b"Private-Lines: five"));
        assert!(!is_putty_key(b"Private-Lines:5"));
        assert!(!is_putty_key(b"Public-Lines: 6"));
    }

    #[test]
    fn non_utf8_around_header_still_matches() {
        assert!(is_putty_key(b"\xc3\x28\xffPrivate-Lines: 1\xfe"));
    }
}

const SNIFF_LEN: usize = 1024;

/// Heuristic text/binary classifier over the first kilobyte of a buffer.
///
/// A NUL byte anywhere in the window is conclusive. Otherwise the buffer is
/// binary when more than 20% of the window are control bytes other than
/// tab, LF, VT, FF and CR.
pub fn is_binary(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SNIFF_LEN)];
    if window.contains(&0) {
        return true;
    }

    let controls = window
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32))
        .count();
    // controls > 20% of len, kept in integers
    controls * 5 > window.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_text() {
        assert!(!is_binary(&[]));
    }

    #[test]
    fn nul_byte_is_binary() {
        assert!(is_binary(b"hello\0world"));
        let mut late = vec![b'a'; 1023];
        late.push(0);
        assert!(is_binary(&late));
    }

    #[test]
    fn nul_past_window_is_ignored() {
        let mut buf = vec![b'a'; 1024];
        buf.push(0);
        assert!(!is_binary(&buf));
    }

    #[test]
    fn whitespace_controls_are_text() {
        assert!(!is_binary(b"a\tb\nc\x0bd\x0ce\r\n"));
    }

    #[test]
    fn control_ratio_threshold() {
        // 2 of 10 is exactly 20%, not over
        assert!(!is_binary(b"\x01\x02abcdefgh"));
        assert!(is_binary(b"\x01\x02\x1babcdefg"));
    }

    #[test]
    fn utf8_text_is_text() {
        assert!(!is_binary("héllo wörld ✓".as_bytes()));
    }
}

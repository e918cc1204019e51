//! Multi-integer scanner.

/// Numeric base for [`scan_ints`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Radix {
    /// `0x` prefix for hex, leading `0` for octal, otherwise decimal
    Auto,
    Decimal,
    /// Hex digits with an optional `0x` prefix
    Hex,
}

/// Read up to `out.len()` integers from `text`.
///
/// Each integer is optional whitespace, an optional sign, an optional base
/// prefix and at least one digit. Scanning stops at the first thing that
/// is not an integer. Returns how many were read and the text after the
/// last one. Values outside `i64` saturate.
pub fn scan_ints<'a>(text: &'a str, out: &mut [i64], radix: Radix) -> (usize, &'a str) {
    let mut rest = text;
    let mut count = 0;
    for slot in out.iter_mut() {
        match scan_int(rest, radix) {
            Some((value, after)) => {
                *slot = value;
                rest = after;
                count += 1;
            }
            None => break,
        }
    }
    (count, rest)
}

/// Read a single integer.
pub fn scan_int(text: &str, radix: Radix) -> Option<(i64, &str)> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let has_hex_prefix = bytes.get(pos) == Some(&b'0')
        && matches!(bytes.get(pos + 1), Some(b'x' | b'X'))
        && bytes.get(pos + 2).is_some_and(u8::is_ascii_hexdigit);

    let base = match radix {
        Radix::Decimal => 10,
        Radix::Hex => {
            if has_hex_prefix {
                pos += 2;
            }
            16
        }
        Radix::Auto if has_hex_prefix => {
            pos += 2;
            16
        }
        Radix::Auto if bytes.get(pos) == Some(&b'0') => 8,
        Radix::Auto => 10,
    };

    let start = pos;
    let mut value: i64 = 0;
    while let Some(digit) = bytes.get(pos).and_then(|&b| (b as char).to_digit(base)) {
        value = value.saturating_mul(base as i64).saturating_add(digit as i64);
        pos += 1;
    }
    if pos == start {
        return None;
    }

    let value = if negative { value.saturating_neg() } else { value };
    Some((value, &text[pos..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_requested_count() {
        let mut out = [0; 3];
        let (n, rest) = scan_ints(" 1 -2\t+3 4", &mut out, Radix::Decimal);
        assert_eq!(n, 3);
        assert_eq!(out, [1, -2, 3]);
        assert_eq!(rest, " 4");
    }

    #[test]
    fn stops_at_non_number() {
        let mut out = [0; 5];
        let (n, rest) = scan_ints("0 3 -1 : 10 10", &mut out, Radix::Decimal);
        assert_eq!(n, 3);
        assert_eq!(&out[..3], &[0, 3, -1]);
        assert_eq!(rest, " : 10 10");
    }

    #[test]
    fn empty_text_reads_nothing() {
        let mut out = [7; 2];
        assert_eq!(scan_ints("   ", &mut out, Radix::Decimal), (0, "   "));
        assert_eq!(out, [7, 7]);
    }

    #[test]
    fn auto_radix_prefixes() {
        assert_eq!(scan_int("0x1F", Radix::Auto), Some((31, "")));
        assert_eq!(scan_int("017", Radix::Auto), Some((15, "")));
        assert_eq!(scan_int("19", Radix::Auto), Some((19, "")));
        assert_eq!(scan_int("0", Radix::Auto), Some((0, "")));
        assert_eq!(scan_int("0x", Radix::Auto), Some((0, "x")));
    }

    #[test]
    fn hex_radix() {
        assert_eq!(scan_int(" 1A :", Radix::Hex), Some((0x1A, " :")));
        assert_eq!(scan_int("0xff", Radix::Hex), Some((0xFF, "")));
        assert_eq!(scan_int(":", Radix::Hex), None);
    }

    #[test]
    fn sign_without_digits_is_not_a_number() {
        assert_eq!(scan_int("- 4", Radix::Decimal), None);
    }

    #[test]
    fn huge_values_saturate() {
        assert_eq!(
            scan_int("99999999999999999999999", Radix::Decimal),
            Some((i64::MAX, ""))
        );
        assert_eq!(
            scan_int("-99999999999999999999999", Radix::Decimal),
            Some((-i64::MAX, ""))
        );
    }
}

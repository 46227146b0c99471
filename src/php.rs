//! PHP compatible scalar functions.
//!
//! Tag options are plain strings and the extension treats them the way PHP
//! treats strings, so these helpers keep those coercion rules in one place.

use std::borrow::Cow;

/// Returns true if the string would be truthy in a PHP boolean context.
///
/// Only the empty string and `"0"` are falsy.
#[inline]
pub fn is_truthy(value: &str) -> bool {
    !matches!(value, "" | "0")
}

/// Like [`is_truthy`], but for an optional value, where `None` is PHP `null`.
#[inline]
pub fn is_truthy_opt(value: Option<&str>) -> bool {
    value.is_some_and(is_truthy)
}

/// Strips whitespace from both ends of a string similar to
/// [`trim`](https://www.php.net/trim), which only considers ASCII space, tab,
/// line feed, carriage return, NUL, and vertical tab to be whitespace.
#[inline]
pub fn trim(value: &str) -> &str {
    value.trim_matches([' ', '\t', '\n', '\r', '\0', '\x0b'])
}

/// Converts a string to an integer similar to
/// [`intval`](https://www.php.net/intval).
///
/// Leading whitespace is skipped, an optional sign is accepted, and then as
/// many decimal digits as possible are consumed. Anything that does not start
/// with a number is 0. Out-of-range values saturate.
pub fn intval(value: &str) -> i64 {
    let value = value.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let mut n = 0_i64;
    for digit in digits[..end].bytes() {
        let digit = i64::from(digit - b'0');
        n = n.saturating_mul(10);
        n = if negative {
            n.saturating_sub(digit)
        } else {
            n.saturating_add(digit)
        };
    }
    n
}

/// Translates characters or replaces substrings similar to
/// [`strtr`](https://php.net/strtr).
///
/// Longer search strings are tried first, and replaced text is never
/// searched again.
pub fn strtr<'a>(input: &'a str, replacements: &[(&str, &str)]) -> Cow<'a, str> {
    let replacements = if replacements.is_sorted_by(|(a, _), (b, _)| a.len() >= b.len()) {
        Cow::Borrowed(replacements)
    } else {
        let mut replacements = Vec::from(replacements);
        replacements.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
        Cow::Owned(replacements)
    };

    let mut iter = input.char_indices();
    let mut out = String::new();
    let mut flushed = 0;
    'next: while iter.offset() != input.len() {
        for (find, replace) in replacements.iter() {
            if !find.is_empty() && iter.as_str().starts_with(find) {
                out += &input[flushed..iter.offset()];
                out += *replace;
                flushed = iter.offset() + find.len();
                for _ in 0..find.chars().count() {
                    iter.next();
                }
                continue 'next;
            }
        }
        iter.next();
    }

    if flushed == 0 {
        Cow::Borrowed(input)
    } else {
        out += &input[flushed..];
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(is_truthy("00"));
        assert!(is_truthy("false"));
        assert!(is_truthy(" "));
        assert!(!is_truthy_opt(None));
        assert!(is_truthy_opt(Some("1")));
    }

    #[test]
    fn trim() {
        assert_eq!(super::trim(" \tfoo\r\n"), "foo");
        assert_eq!(
            super::trim("\u{a0}foo\u{a0}"),
            "\u{a0}foo\u{a0}",
            "non-ASCII whitespace should be kept"
        );
    }

    #[test]
    fn intval() {
        assert_eq!(super::intval("42"), 42);
        assert_eq!(super::intval("  42px"), 42);
        assert_eq!(super::intval("-7"), -7);
        assert_eq!(super::intval("+7"), 7);
        assert_eq!(super::intval("px42"), 0);
        assert_eq!(super::intval(""), 0);
        assert_eq!(super::intval("-"), 0);
        assert_eq!(super::intval("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn strtr() {
        assert_eq!(super::strtr("a-{b}-", &[("-{", "X"), ("}-", "Y")]), "aXbY");
        assert_eq!(super::strtr("abc", &[("x", "y")]), Cow::Borrowed("abc"));
        assert_eq!(
            super::strtr("aab", &[("a", "b"), ("aa", "c")]),
            "cb",
            "longest match wins"
        );
        assert_eq!(super::strtr("é-é", &[("é", "e")]), "e-e");
    }
}

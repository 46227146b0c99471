//! Text helpers shared by the form renderer and the host implementation which
//! correspond to MediaWiki core utility functions (`Sanitizer`, `wfMessage`,
//! `wfUrlencode`).

use crate::php::strtr;
use html_escape::NAMED_ENTITIES;
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

/// The bundled English i18n dictionary.
pub(crate) static MESSAGES: LazyLock<serde_json::Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../res/i18n/en.json")).unwrap_or_else(|err| {
        log::error!("bundled message catalogue is corrupt: {err}");
        serde_json::Value::Null
    })
});

/// Decodes HTML character references according to the Wikitext rules.
///
/// Unlike HTML5, a reference must be terminated by a semicolon, and invalid
/// references are left alone.
pub fn decode_html(text: &str) -> Cow<'_, str> {
    const MAX_LEN: usize = {
        let mut max = 0;
        let mut entities = NAMED_ENTITIES.as_slice();
        while let [(name, _), rest @ ..] = entities {
            if name.len() > max {
                max = name.len();
            }
            entities = rest;
        }

        if "רלמ".len() > max {
            max = "רלמ".len();
        }

        if "رلم".len() > max {
            max = "رلم".len();
        }

        max + b";".len()
    };

    let bytes = text.as_bytes();
    let entity_ranges = memchr::memchr_iter(b'&', bytes).filter_map(|start| {
        let next = start + "&".len();
        memchr::memchr(b';', &bytes[next..(next + MAX_LEN).min(bytes.len())])
            .map(|len| start..(next + len + b";".len()))
    });

    let mut flushed = 0;
    let mut out = String::new();
    for range in entity_ranges {
        // A previous reference may already have consumed this ampersand
        if range.start < flushed {
            continue;
        }

        let mut char = [0; 4];
        let name = &text[range.start + 1..range.end - 1];
        let value = if let Some(name) = name.strip_prefix('#') {
            if let Some(name) = name.strip_prefix(|c: char| matches!(c, 'X' | 'x')) {
                u32::from_str_radix(name, 16)
            } else {
                name.parse::<u32>()
            }
            .ok()
            .and_then(char::from_u32)
            .map(|c| &*c.encode_utf8(&mut char))
        } else {
            NAMED_ENTITIES
                .binary_search_by(|(t_name, _)| t_name.cmp(&name.as_bytes()))
                .map_or_else(
                    |_| (name == "רלמ" || name == "رلم").then_some("\u{200f}"),
                    |index| Some(NAMED_ENTITIES[index].1),
                )
        };
        if let Some(value) = value {
            out += &text[flushed..range.start];
            out += value;
            flushed = range.end;
        }
    }

    if flushed != 0 {
        out += &text[flushed..];
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}

/// Escapes a string for use as the value of an HTML `id` attribute.
///
/// HTML5 forbids ASCII whitespace in ids, so each whitespace character is
/// replaced by an underscore. Everything else is left for the attribute
/// encoder.
pub fn escape_id_for_attribute(id: &str) -> Cow<'_, str> {
    strtr(
        id,
        &[
            ("\t", "_"),
            ("\n", "_"),
            ("\x0c", "_"),
            ("\r", "_"),
            (" ", "_"),
        ],
    )
}

/// Finds the first valid message from the list of keys given in `keys` and
/// returns that message, formatted using `cb` to replace any `$N` placeholders.
/// If `cb` returns `None`, no replacement occurs.
///
/// If the message is not found, returns a not-found string.
pub fn format_message<'a, F, I, R, E>(keys: I, cb: F) -> Result<Cow<'static, str>, E>
where
    R: AsRef<str> + Default,
    I: IntoIterator<Item = R>,
    F: FnMut(&str) -> Result<Option<Cow<'a, str>>, E>,
{
    let mut last = R::default();
    for key in keys {
        if let Some(message) = MESSAGES
            .get(key.as_ref().to_lowercase())
            .and_then(serde_json::Value::as_str)
            .filter(|message| !matches!(*message, "" | "-"))
        {
            return format_raw_message(message, cb);
        }
        last = key;
    }

    let last = html_escape::encode_text(last.as_ref());
    let last = strtr(&last, &[("\u{0338}", "&#x338;")]);
    Ok(format!("⧼{last}⧽").into())
}

/// Formats a message, using `cb` to replace any `$N` placeholders in the
/// message. If `cb` returns `None`, no replacement occurs.
pub fn format_raw_message<'a, E, F>(message: &str, mut cb: F) -> Result<Cow<'_, str>, E>
where
    F: FnMut(&str) -> Result<Option<Cow<'a, str>>, E>,
{
    static RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\d+)").unwrap());

    let mut out = String::new();
    let mut flushed = 0;
    for capture in RE.captures_iter(message) {
        let (_, [key]) = capture.extract();
        if let Some(value) = cb(key)? {
            let range = capture.get_match().range();
            out += &message[flushed..range.start];
            out += &value;
            flushed = range.end;
        }
    }

    Ok(if flushed == 0 {
        Cow::Borrowed(message)
    } else {
        out += &message[flushed..];
        Cow::Owned(out)
    })
}

/// Formats the message `key` from the bundled dictionary, substituting `$1`,
/// `$2`, … with the corresponding entries of `params`.
pub fn message(key: &str, params: &[&str]) -> String {
    let result = format_message::<_, _, _, core::convert::Infallible>([key], |n| {
        Ok(n.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| params.get(n))
            .map(|param| Cow::Owned((*param).to_string())))
    });
    match result {
        Ok(message) => message.into_owned(),
        Err(never) => match never {},
    }
}

/// Percent-encodes a URL part.
#[inline]
pub fn url_encode(input: &str) -> percent_encoding::PercentEncode<'_> {
    percent_encoding::utf8_percent_encode(input, &ALPHABET)
}

/// The alphabet of characters to percent-encode when encoding URLs.
const ALPHABET: percent_encoding::AsciiSet = percent_encoding::CONTROLS
    .add(b'%')
    .add(b'#')
    .add(b'\'')
    .add(b'"')
    .add(b'&')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b' ');

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_html() {
        assert_eq!(
            decode_html("hello & world"),
            Cow::Borrowed("hello & world"),
            "non-entity should remain as-is"
        );
        assert_eq!(
            decode_html("hello&nbsp;world"),
            Cow::Owned::<str>(String::from("hello\u{00a0}world")),
            "entity should decode"
        );
        assert_eq!(
            decode_html("hello&oops;world"),
            Cow::Borrowed("hello&oops;world"),
            "invalid entity should remain as-is"
        );
        assert_eq!(
            decode_html("hello&nbsp world"),
            Cow::Borrowed("hello&nbsp world"),
            "html5 entity termination rules should not be used"
        );
        assert_eq!(
            decode_html("hello&#42;world"),
            Cow::Borrowed("hello*world"),
            "decimal entity should decode"
        );
        assert_eq!(
            decode_html("hello&#x42;world"),
            Cow::Borrowed("helloBworld"),
            "hexadecimal entity should decode"
        );
        assert_eq!(
            decode_html("hello&&nbsp;world"),
            Cow::Owned::<str>(String::from("hello&\u{00a0}world")),
            "incomplete entity should not interfere with later entity"
        );
    }

    #[test]
    fn escape_id() {
        assert_eq!(escape_id_for_attribute("foo"), Cow::Borrowed("foo"));
        assert_eq!(escape_id_for_attribute("foo bar\tbaz"), "foo_bar_baz");
        assert_eq!(escape_id_for_attribute("-0.5"), "-0.5");
    }

    #[test]
    fn messages() {
        assert_eq!(message("inputbox-tryexact", &[]), "Try exact match");
        assert!(message("inputbox-error-bad-type", &["bogus"]).starts_with(
            "Input box type \"bogus\" not recognised."
        ));
        assert_eq!(message("no-such-message", &[]), "⧼no-such-message⧽");
    }

    #[test]
    fn raw_message() {
        let result = format_raw_message::<(), _>("$1 and $2 and $3", |key| {
            Ok(match key {
                "1" => Some(Cow::Borrowed("one")),
                "2" => Some(Cow::Borrowed("two")),
                _ => None,
            })
        });
        assert_eq!(result, Ok(Cow::Owned("one and two and $3".to_string())));
    }
}

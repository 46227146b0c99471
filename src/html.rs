//! HTML element building primitives.
//!
//! MediaWiki has two generations of these helpers and form markup uses both,
//! so both are reproduced here:
//!
//! * The `xml_*` functions emit every attribute as given and use XML-style
//!   short tags (`<input />`).
//! * The `html_*` functions follow HTML5 serialisation rules: void elements
//!   are never closed, boolean attributes are emitted as `name=""` or not at
//!   all, and attributes equal to the element default are dropped.

use crate::php::strtr;
use core::fmt;
use std::borrow::Cow;

/// An attribute value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value<'a> {
    /// A boolean attribute. `false` attributes are never emitted.
    Bool(bool),
    /// A text attribute.
    Text(Cow<'a, str>),
}

impl Value<'_> {
    /// Returns true if the value is the empty string.
    fn is_empty_text(&self) -> bool {
        matches!(self, Value::Text(text) if text.is_empty())
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<String> for Value<'_> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for Value<'_> {
    fn from(value: u32) -> Self {
        Self::Text(Cow::Owned(value.to_string()))
    }
}

/// An ordered list of attributes.
pub type Attrs<'a> = Vec<(&'a str, Value<'a>)>;

/// Builds an [`Attrs`] list from `name => value` pairs.
macro_rules! attrs {
    ($($name:expr => $value:expr),* $(,)?) => {
        vec![$(($name, $crate::html::Value::from($value))),*]
    };
}

pub(crate) use attrs;

/// HTML void elements which never have content or an end tag.
static VOID_ELEMENTS: phf::Set<&str> = phf::phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr"
};

/// Attributes which are emitted by presence alone.
static BOOLEAN_ATTRIBUTES: phf::Set<&str> = phf::phf_set! {
    "async", "autofocus", "autoplay", "checked", "controls", "default", "defer",
    "disabled", "formnovalidate", "hidden", "ismap", "loop", "multiple", "muted",
    "novalidate", "open", "readonly", "required", "reversed", "scoped",
    "seamless", "selected", "truespeed", "typemustmatch"
};

/// Encodes an attribute value for the `xml_*` family. Both quote styles are
/// escaped.
fn encode_xml_attribute(value: &str) -> Cow<'_, str> {
    let value = html_escape::encode_quoted_attribute(value);
    encode_whitespace(value)
}

/// Encodes an attribute value for the `html_*` family.
fn encode_html_attribute(value: &str) -> Cow<'_, str> {
    let value = html_escape::encode_double_quoted_attribute(value);
    encode_whitespace(value)
}

/// Encodes non-space whitespace so it survives attribute value normalisation.
fn encode_whitespace(value: Cow<'_, str>) -> Cow<'_, str> {
    const WHITESPACE: &[(&str, &str)] = &[("\n", "&#10;"), ("\r", "&#13;"), ("\t", "&#9;")];
    match value {
        Cow::Borrowed(value) => strtr(value, WHITESPACE),
        Cow::Owned(value) => Cow::Owned(strtr(&value, WHITESPACE).into_owned()),
    }
}

/// Writes attributes in `xml_*` style.
fn write_xml_attributes<W: fmt::Write + ?Sized>(out: &mut W, attrs: &[(&str, Value<'_>)]) -> fmt::Result {
    for (name, value) in attrs {
        match value {
            Value::Text(value) => write!(out, r#" {name}="{}""#, encode_xml_attribute(value))?,
            Value::Bool(true) => write!(out, r#" {name}="{name}""#)?,
            Value::Bool(false) => {}
        }
    }
    Ok(())
}

/// Writes an open tag, `<name attrs…>`, emitting all attributes verbatim.
pub fn xml_open_element<W: fmt::Write + ?Sized>(
    out: &mut W,
    name: &str,
    attrs: &[(&str, Value<'_>)],
) -> fmt::Result {
    write!(out, "<{name}")?;
    write_xml_attributes(out, attrs)?;
    out.write_char('>')
}

/// Writes a close tag, `</name>`.
pub fn xml_close_element<W: fmt::Write + ?Sized>(out: &mut W, name: &str) -> fmt::Result {
    write!(out, "</{name}>")
}

/// Writes a complete element. Empty content produces a short tag
/// (`<name attrs />`); other content is text-escaped.
pub fn xml_element<W: fmt::Write + ?Sized>(
    out: &mut W,
    name: &str,
    attrs: &[(&str, Value<'_>)],
    content: &str,
) -> fmt::Result {
    write!(out, "<{name}")?;
    write_xml_attributes(out, attrs)?;
    if content.is_empty() {
        out.write_str(" />")
    } else {
        write!(out, ">{}</{name}>", html_escape::encode_text(content))
    }
}

/// Writes a `<label>` for the element with the given `id`.
pub fn xml_label<W: fmt::Write + ?Sized>(out: &mut W, label: &str, id: &str) -> fmt::Result {
    xml_element(out, "label", &attrs!["for" => id], label)
}

/// Removes attributes whose values are the same as the element default.
fn drop_defaults<'a>(element: &str, attrs: &'a [(&'a str, Value<'a>)]) -> Vec<&'a (&'a str, Value<'a>)> {
    let input_type = attrs.iter().find_map(|(name, value)| match value {
        Value::Text(value) if *name == "type" => Some(&**value),
        _ => None,
    });

    attrs
        .iter()
        .filter(|(name, value)| match (element, *name) {
            ("input", "type") => !matches!(value, Value::Text(t) if t == "text"),
            ("input", "value") => {
                matches!(input_type, Some("checkbox" | "radio" | "submit")) || !value.is_empty_text()
            }
            (_, "class" | "id") => !value.is_empty_text(),
            _ => true,
        })
        .collect()
}

/// Writes an open tag with HTML5 attribute rules. Void elements are not
/// closed.
pub fn html_open_element<W: fmt::Write + ?Sized>(
    out: &mut W,
    name: &str,
    attrs: &[(&str, Value<'_>)],
) -> fmt::Result {
    write!(out, "<{name}")?;
    for (attr, value) in drop_defaults(name, attrs) {
        match value {
            Value::Text(value) if BOOLEAN_ATTRIBUTES.contains(*attr) => {
                if !value.is_empty() {
                    write!(out, r#" {attr}="""#)?;
                }
            }
            Value::Text(value) => write!(out, r#" {attr}="{}""#, encode_html_attribute(value))?,
            Value::Bool(true) => write!(out, r#" {attr}="""#)?,
            Value::Bool(false) => {}
        }
    }
    out.write_char('>')
}

/// Writes a complete element with HTML5 attribute rules.
pub fn html_element<W: fmt::Write + ?Sized>(
    out: &mut W,
    name: &str,
    attrs: &[(&str, Value<'_>)],
    content: &str,
) -> fmt::Result {
    html_open_element(out, name, attrs)?;
    if !VOID_ELEMENTS.contains(name) {
        write!(out, "{}</{name}>", html_escape::encode_text(content))?;
    }
    Ok(())
}

/// Writes a hidden form field.
pub fn html_hidden<W: fmt::Write + ?Sized>(out: &mut W, name: &str, value: &str) -> fmt::Result {
    html_element(
        out,
        "input",
        &attrs!["type" => "hidden", "value" => value, "name" => name],
        "",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(f: impl FnOnce(&mut String) -> fmt::Result) -> String {
        let mut out = String::new();
        f(&mut out).unwrap();
        out
    }

    #[test]
    fn hidden() {
        assert_eq!(
            build(|out| html_hidden(out, "action", "edit")),
            r#"<input type="hidden" value="edit" name="action">"#
        );
        assert_eq!(
            build(|out| html_hidden(out, "wpReason", "")),
            r#"<input type="hidden" name="wpReason">"#,
            "empty value should be dropped"
        );
        assert_eq!(
            build(|out| html_hidden(out, "preload", "a\"b&c")),
            r#"<input type="hidden" value="a&quot;b&amp;c" name="preload">"#
        );
    }

    #[test]
    fn html_input_defaults() {
        assert_eq!(
            build(|out| html_open_element(
                out,
                "input",
                &attrs![
                    "type" => "text",
                    "name" => "title",
                    "class" => "",
                    "value" => "",
                    "required" => true,
                    "size" => 50_u32,
                ]
            )),
            r#"<input name="title" required="" size="50">"#
        );
        assert_eq!(
            build(|out| html_open_element(
                out,
                "input",
                &attrs!["type" => "submit", "value" => "", "required" => false]
            )),
            r#"<input type="submit" value="">"#
        );
    }

    #[test]
    fn xml_elements() {
        assert_eq!(
            build(|out| xml_element(out, "input", &attrs!["type" => "submit", "value" => "Go"], "")),
            r#"<input type="submit" value="Go" />"#
        );
        assert_eq!(
            build(|out| xml_element(out, "strong", &attrs!["class" => "error"], "a < b")),
            r#"<strong class="error">a &lt; b</strong>"#
        );
        assert_eq!(
            build(|out| xml_open_element(out, "div", &attrs!["style" => ""])),
            r#"<div style="">"#
        );
        assert_eq!(
            build(|out| xml_label(out, "Talk", "mw-inputbox-ns1")),
            r#"<label for="mw-inputbox-ns1">Talk</label>"#
        );
        assert_eq!(
            build(|out| xml_open_element(out, "form", &attrs!["name" => "a\nb"])),
            r#"<form name="a&#10;b">"#
        );
    }
}

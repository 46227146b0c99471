//! Form renderers for each [`FormType`](super::FormType).

use super::{FormType, InputBox, LineBreak};
use crate::{
    common::escape_id_for_attribute,
    host::Host,
    html::{
        Attrs, attrs, html_hidden, html_open_element, xml_close_element, xml_element, xml_label,
        xml_open_element,
    },
    php::{is_truthy, is_truthy_opt, trim},
    title::Namespace,
};
use core::fmt::{self, Write as _};
use indexmap::{IndexMap, IndexSet};
use std::borrow::Cow;

/// The result type for form renderers.
type Result<T = (), E = fmt::Error> = core::result::Result<T, E>;

/// A no-break space, used between the text box and the "Go" button.
const NBSP: char = '\u{a0}';

/// Writes the in-page error message.
pub(super) fn error(out: &mut String, message: &str) -> Result {
    xml_open_element(out, "div", &[])?;
    xml_element(out, "strong", &attrs!["class" => "error"], message)?;
    xml_close_element(out, "div")
}

/// Writes the create page and new section (`comment`) form.
pub(super) fn create<H: Host + ?Sized>(out: &mut String, ib: &InputBox, host: &H) -> Result {
    let fallback = if ib.kind == FormType::Comment {
        "inputbox-postcomment"
    } else {
        "inputbox-createarticle"
    };
    let button_label = ib.primary_label(host, fallback);

    open_container(out, ib)?;
    open_form(out, ib, attrs![
        "name" => "createbox",
        "class" => "createbox",
        "action" => host.script(),
        "method" => "get",
    ])?;

    edit_fields(out, ib, host)?;
    if let Some(summary) = &ib.summary {
        html_hidden(out, "summary", summary)?;
    }
    if let Some(no_summary) = &ib.no_summary {
        html_hidden(out, "nosummary", no_summary)?;
    }
    if !ib.prefix.is_empty() {
        html_hidden(out, "prefix", &ib.prefix)?;
    }
    if let Some(minor) = &ib.minor {
        html_hidden(out, "minor", minor)?;
    }
    if ib.kind == FormType::Comment {
        section_fields(out, ib)?;
    }

    ib.text_box(out, attrs![
        "type" => ib.input_type(),
        "name" => "title",
        "class" => format!("{}mw-ui-input mw-ui-input-inline mw-inputbox-createbox", ib.line_break_classes()),
        "value" => &ib.default_text,
        "placeholder" => &ib.placeholder,
        "required" => !ib.is_hidden(),
        "size" => ib.width,
        "dir" => ib.dir.as_str(),
    ])?;

    out.write_str(ib.line_break.as_str())?;
    xml_open_element(out, "input", &attrs![
        "type" => "submit",
        "name" => "create",
        "class" => "mw-ui-button mw-ui-progressive",
        "value" => button_label,
    ])?;
    close_form(out)
}

/// Writes the move page form.
pub(super) fn move_page<H: Host + ?Sized>(out: &mut String, ib: &InputBox, host: &H) -> Result {
    let button_label = ib.primary_label(host, "inputbox-movearticle");

    open_container(out, ib)?;
    open_form(out, ib, attrs![
        "name" => "movebox",
        "class" => "mw-movebox",
        "action" => host.script(),
        "method" => "get",
    ])?;

    html_hidden(out, "title", &host.special_page_title("Movepage", &ib.page))?;
    html_hidden(out, "wpReason", ib.summary.as_deref().unwrap_or_default())?;
    html_hidden(out, "prefix", &ib.prefix)?;

    ib.text_box(out, attrs![
        "type" => ib.input_type(),
        "name" => "wpNewTitle",
        "class" => format!("{}mw-moveboxInput mw-ui-input mw-ui-input-inline", ib.line_break_classes()),
        "value" => &ib.default_text,
        "placeholder" => &ib.placeholder,
        "size" => ib.width,
        "dir" => ib.dir.as_str(),
    ])?;

    out.write_str(ib.line_break.as_str())?;
    xml_open_element(out, "input", &attrs![
        "type" => "submit",
        "class" => "mw-ui-button mw-ui-progressive",
        "value" => button_label,
    ])?;
    close_form(out)
}

/// Writes the new section form where the text box holds the section title.
pub(super) fn comment_title<H: Host + ?Sized>(out: &mut String, ib: &InputBox, host: &H) -> Result {
    let button_label = ib.primary_label(host, "inputbox-postcommenttitle");

    open_container(out, ib)?;
    open_form(out, ib, attrs![
        "name" => "commentbox",
        "class" => "commentbox",
        "action" => host.script(),
        "method" => "get",
    ])?;

    edit_fields(out, ib, host)?;

    ib.text_box(out, attrs![
        "type" => ib.input_type(),
        "name" => "preloadtitle",
        "class" => format!("{}commentboxInput mw-ui-input mw-ui-input-inline", ib.line_break_classes()),
        "value" => &ib.default_text,
        "placeholder" => &ib.placeholder,
        "size" => ib.width,
        "dir" => ib.dir.as_str(),
    ])?;

    section_fields(out, ib)?;
    html_hidden(out, "title", &ib.page)?;

    out.write_str(ib.line_break.as_str())?;
    xml_open_element(out, "input", &attrs![
        "type" => "submit",
        "name" => "create",
        "class" => "mw-ui-button mw-ui-progressive",
        "value" => button_label,
    ])?;
    close_form(out)
}

/// Writes the `search` and `fulltext` forms.
pub(super) fn search<H: Host + ?Sized>(out: &mut String, ib: &InputBox, host: &H) -> Result {
    let button_label = ib.primary_label(host, "inputbox-tryexact");
    let search_button_label = ib.full_text_label(host);

    // Labels need unique ids, even with several search forms on one page
    let id_suffix = format!("-{}{}", ib.id, random_string(host));
    let id_suffix = escape_id_for_attribute(&id_suffix);

    open_container(out, ib)?;
    open_form(out, ib, attrs![
        "name" => "searchbox",
        "class" => "searchbox",
        "action" => host.special_page_url("Search"),
    ])?;

    ib.text_box(out, attrs![
        "class" => format!(
            "{}mw-searchInput searchboxInput mw-ui-input mw-ui-input-inline",
            ib.line_break_classes()
        ),
        "name" => "search",
        "type" => ib.input_type(),
        "value" => &ib.default_text,
        "placeholder" => &ib.placeholder,
        "size" => ib.width,
        "dir" => ib.dir.as_str(),
    ])?;

    for (name, value) in [
        ("prefix", &ib.prefix),
        ("searchfilter", &ib.search_filter),
        ("tour", &ib.tour),
    ] {
        if !value.is_empty() {
            html_hidden(out, name, value)?;
        }
    }

    out.write_str(ib.line_break.as_str())?;

    if is_truthy(&ib.namespaces) {
        namespace_fields(out, ib, host, &id_suffix)?;
        out.write_str(ib.line_break.as_str())?;
    } else if ib.kind == FormType::Search {
        xml_element(out, "input", &attrs![
            "type" => "submit",
            "name" => "go",
            "class" => "mw-ui-button",
            "value" => &*button_label,
        ], "")?;
        out.write_char(NBSP)?;
    }

    xml_element(out, "input", &attrs![
        "type" => "submit",
        "name" => "fulltext",
        "class" => "mw-ui-button",
        "value" => search_button_label,
    ], "")?;

    if ib.kind == FormType::FullText {
        html_hidden(out, "fulltext", "Search")?;
    }

    close_form(out)
}

/// Writes the namespace selection of a search form.
fn namespace_fields<H: Host + ?Sized>(
    out: &mut String,
    ib: &InputBox,
    host: &H,
    id_suffix: &str,
) -> Result {
    let main_label = host.content_message("inputbox-ns-main", &[]);

    let mut shown = IndexMap::<i32, String>::new();
    let mut checked_names = IndexSet::<String>::new();
    let mut checked_ids = IndexSet::<i32>::new();
    for entry in ib.namespaces.split(',') {
        let mut entry = trim(entry).to_string();

        if entry.find("**").is_some_and(|index| index != 0) {
            entry = entry.replace("**", "");
            checked_names.insert(entry.clone());
        }

        let Some(id) = resolve_namespace(host, &entry, &main_label) else {
            log::debug!("ignoring unknown namespace {entry:?}");
            continue;
        };

        if checked_names.contains(&entry) {
            checked_ids.insert(id);
        }
        shown.insert(id, entry);
    }

    let only_one = shown.len() == 1;
    for (id, name) in &shown {
        let checked = only_one || checked_ids.contains(id);
        let element_id = format!("mw-inputbox-ns{id}{id_suffix}");
        let field_name = format!("ns{id}");
        if only_one {
            xml_element(out, "input", &attrs![
                "type" => "hidden",
                "name" => &field_name,
                "value" => "1",
                "id" => &element_id,
                "checked" => checked,
            ], "")?;
        } else {
            out.write_str(r#" <div class="mw-inputbox-element mw-ui-checkbox">"#)?;
            xml_element(out, "input", &attrs![
                "type" => "checkbox",
                "name" => &field_name,
                "value" => "1",
                "id" => &element_id,
                "checked" => checked,
            ], "")?;
            xml_label(out, name, &element_id)?;
            out.write_str("</div> ")?;
        }
    }

    Ok(())
}

/// Finds the namespace named by a search form namespace entry.
///
/// Unlike title parsing, names must match exactly apart from spaces and
/// underscores, and the main namespace is spelled `Main` or the localised
/// equivalent.
fn resolve_namespace<H: Host + ?Sized>(host: &H, name: &str, main_label: &str) -> Option<i32> {
    fn same(a: &str, b: &str) -> bool {
        a.len() == b.len() && a.chars().zip(b.chars()).all(|(a, b)| {
            a == b || matches!((a, b), (' ', '_') | ('_', ' '))
        })
    }

    if name == "Main" || name == main_label {
        return Some(Namespace::MAIN);
    }

    let site = host.site();
    site.namespaces
        .iter()
        .find(|ns| ns.id != Namespace::MAIN && same(&ns.name, name))
        .or_else(|| {
            site.namespaces
                .iter()
                .find(|ns| ns.aliases.iter().any(|alias| same(alias, name)))
        })
        .map(|ns| ns.id)
        .or_else(|| {
            site.namespace_aliases
                .iter()
                .find(|(alias, _)| same(alias, name))
                .map(|(_, id)| *id)
        })
}

/// Writes the compact `search2` form.
pub(super) fn search2<H: Host + ?Sized>(out: &mut String, ib: &InputBox, host: &H) -> Result {
    let button_label = ib.primary_label(host, "inputbox-tryexact");

    let unescaped_id = if ib.id.is_empty() {
        Cow::Owned(random_string(host))
    } else {
        Cow::Borrowed(ib.id.as_str())
    };
    let id = escape_id_for_attribute(&unescaped_id);
    let inline = if is_truthy_opt(ib.inline.as_deref()) {
        " mw-inputbox-inline"
    } else {
        ""
    };

    xml_open_element(out, "form", &attrs![
        "name" => format!("bodySearch{id}"),
        "id" => format!("bodySearch{id}"),
        "class" => format!("bodySearch{inline}"),
        "action" => host.special_page_url("Search"),
    ])?;
    xml_open_element(out, "div", &attrs![
        "class" => format!("bodySearchWrap{inline}"),
        "style" => ib.bg_color_style(),
    ])?;

    if !trim(&ib.label_text).is_empty() {
        xml_open_element(out, "label", &attrs!["for" => format!("bodySearchInput{id}")])?;
        out.write_str(&host.parse_inline(&ib.label_text))?;
        xml_close_element(out, "label")?;
    }

    ib.text_box(out, attrs![
        "type" => ib.input_type(),
        "name" => "search",
        "class" => "mw-searchInput mw-ui-input mw-ui-input-inline",
        "size" => ib.width,
        "id" => format!("bodySearchInput{id}"),
        "dir" => ib.dir.as_str(),
        "placeholder" => &ib.placeholder,
    ])?;

    out.write_char(NBSP)?;
    xml_element(out, "input", &attrs![
        "type" => "submit",
        "name" => "go",
        "value" => button_label,
        "class" => "mw-ui-button",
    ], "")?;

    if is_truthy(&ib.full_text_button) {
        xml_element(out, "input", &attrs![
            "type" => "submit",
            "name" => "fulltext",
            "class" => "mw-ui-button",
            "value" => &ib.search_button_label,
        ], "")?;
    }

    xml_close_element(out, "div")?;
    xml_close_element(out, "form")
}

/// Writes the centred container which wraps all forms except `search2`.
fn open_container(out: &mut String, ib: &InputBox) -> Result {
    xml_open_element(out, "div", &attrs![
        "class" => "mw-inputbox-centered",
        "style" => ib.bg_color_style(),
    ])
}

/// Writes a form open tag with the optional form id appended.
fn open_form<'a>(out: &mut String, ib: &'a InputBox, mut attrs: Attrs<'a>) -> Result {
    if !ib.id.is_empty() {
        attrs.extend(attrs!["id" => escape_id_for_attribute(&ib.id)]);
    }
    xml_open_element(out, "form", &attrs)
}

/// Closes the form and its container.
fn close_form(out: &mut String) -> Result {
    xml_close_element(out, "form")?;
    xml_close_element(out, "div")
}

/// Writes the hidden fields which open the editor with preloaded content.
fn edit_fields<H: Host + ?Sized>(out: &mut String, ib: &InputBox, host: &H) -> Result {
    let (name, value) = ib.edit_action(host);
    html_hidden(out, name, value)?;
    if let Some(preload) = &ib.preload {
        html_hidden(out, "preload", preload)?;
    }
    for param in &ib.preload_params {
        html_hidden(out, "preloadparams[]", param)?;
    }
    if let Some(edit_intro) = &ib.edit_intro {
        html_hidden(out, "editintro", edit_intro)?;
    }
    Ok(())
}

/// Writes the hidden fields which make the editor add a new section.
fn section_fields(out: &mut String, ib: &InputBox) -> Result {
    html_hidden(out, "section", "new")?;
    if is_truthy_opt(ib.use_dt.as_deref()) {
        html_hidden(out, "dtpreload", "1")?;
    }
    Ok(())
}

/// Returns a random number formatted the same way as ids from other
/// MediaWiki components.
fn random_string<H: Host + ?Sized>(host: &H) -> String {
    format!("{:.12}", host.random())
}

impl InputBox {
    /// The label for the primary button, or the given fallback message.
    fn primary_label<H: Host + ?Sized>(&self, host: &H, fallback: &str) -> Cow<'_, str> {
        if is_truthy(&self.button_label) {
            Cow::Borrowed(&self.button_label)
        } else {
            Cow::Owned(host.message(fallback, &[]))
        }
    }

    /// The label for the full text search button.
    fn full_text_label<H: Host + ?Sized>(&self, host: &H) -> Cow<'_, str> {
        if is_truthy(&self.search_button_label) {
            Cow::Borrowed(&self.search_button_label)
        } else {
            Cow::Owned(host.message("inputbox-searchfulltext", &[]))
        }
    }

    /// The inline style for the background colour.
    fn bg_color_style(&self) -> Cow<'_, str> {
        if self.bg_color == "transparent" {
            Cow::Borrowed("")
        } else {
            Cow::Owned(format!("background-color: {};", self.bg_color))
        }
    }

    /// The hidden field which selects the editor.
    fn edit_action<H: Host + ?Sized>(&self, host: &H) -> (&'static str, &'static str) {
        if self.use_ve.is_some() && host.is_extension_loaded("VisualEditor") {
            ("veaction", "edit")
        } else {
            ("action", "edit")
        }
    }

    /// The type of the primary text box.
    fn input_type(&self) -> &'static str {
        if self.is_hidden() { "hidden" } else { "text" }
    }

    /// Returns true if the primary text box is hidden.
    fn is_hidden(&self) -> bool {
        is_truthy_opt(self.hidden.as_deref())
    }

    /// Extra classes for text boxes which are followed by a line break.
    fn line_break_classes(&self) -> &'static str {
        if self.line_break == LineBreak::Br {
            "mw-inputbox-input "
        } else {
            ""
        }
    }

    /// Writes the primary text box.
    fn text_box<'a>(&'a self, out: &mut String, mut attrs: Attrs<'a>) -> Result {
        if !self.aria_label.is_empty() {
            attrs.extend(attrs!["aria-label" => &self.aria_label]);
        }
        html_open_element(out, "input", &attrs)
    }
}

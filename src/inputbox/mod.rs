//! The `<inputbox>` extension tag, which turns a block of `key=value` options
//! into one of several HTML forms for searching, creating, or moving pages.

// This code is (very, very loosely) adapted from mediawiki-extensions-InputBox
// <https://github.com/wikimedia/mediawiki-extensions-InputBox>.
//
// The upstream copyright is:
//
// SPDX-License-Identifier: MIT

use crate::{
    common::decode_html,
    config::Direction,
    host::Host,
    php::{intval, is_truthy_opt, trim},
};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

mod forms;

/// Style modules which must be loaded on any page containing an input box.
pub const MODULE_STYLES: &[&str] = &[
    "ext.inputBox.styles",
    "mediawiki.ui.input",
    "mediawiki.ui.checkbox",
    "mediawiki.ui.button",
];

/// The kind of form to render.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FormType {
    /// A page creation form.
    Create,
    /// A new section form whose title box is the target page.
    Comment,
    /// A page move form.
    Move,
    /// A new section form whose title box is the section title.
    CommentTitle,
    /// A search form with a "Go" button.
    Search,
    /// A search form with only a full text search button.
    FullText,
    /// A compact search form.
    Search2,
    /// No type was given.
    #[default]
    Missing,
    /// An unrecognised type.
    Unknown(String),
}

impl FormType {
    /// Parses a `type` option value.
    fn from_option(value: &str) -> Self {
        match value {
            "" => Self::Missing,
            "create" => Self::Create,
            "comment" => Self::Comment,
            "move" => Self::Move,
            "commenttitle" => Self::CommentTitle,
            "search" => Self::Search,
            "fulltext" => Self::FullText,
            "search2" => Self::Search2,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// The separator placed between the text box and the buttons.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineBreak {
    /// A space, keeping the buttons on the same line.
    Space,
    /// A line break.
    #[default]
    Br,
}

impl LineBreak {
    /// Parses a `break` option value. Only `no` keeps everything on one line.
    fn from_option(value: &str) -> Self {
        if value.eq_ignore_ascii_case("no") {
            Self::Space
        } else {
            Self::Br
        }
    }

    /// The HTML for this separator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Space => " ",
            Self::Br => "<br />",
        }
    }
}

/// Option names which are accepted in the tag body.
#[derive(Clone, Copy, Debug)]
enum Key {
    AriaLabel,
    BgColor,
    Break,
    ButtonLabel,
    Default,
    Dir,
    EditIntro,
    FullTextButton,
    Hidden,
    Id,
    Inline,
    LabelText,
    Minor,
    Namespaces,
    NoSummary,
    Page,
    Placeholder,
    Prefix,
    Preload,
    SearchButtonLabel,
    SearchFilter,
    Summary,
    Tour,
    Type,
    UseDt,
    UseVe,
    Width,
}

impl Key {
    /// Returns true if values for this option may contain language variant
    /// markup.
    fn is_convertible(self) -> bool {
        matches!(
            self,
            Self::AriaLabel
                | Self::ButtonLabel
                | Self::Default
                | Self::Placeholder
                | Self::SearchButtonLabel
        )
    }
}

/// Option names mapped to the field they set.
static OPTIONS: phf::Map<&'static str, Key> = phf::phf_map! {
    "arialabel" => Key::AriaLabel,
    "bgcolor" => Key::BgColor,
    "break" => Key::Break,
    "buttonlabel" => Key::ButtonLabel,
    "default" => Key::Default,
    "dir" => Key::Dir,
    "editintro" => Key::EditIntro,
    "fulltextbutton" => Key::FullTextButton,
    "hidden" => Key::Hidden,
    "id" => Key::Id,
    "inline" => Key::Inline,
    "labeltext" => Key::LabelText,
    "minor" => Key::Minor,
    "namespaces" => Key::Namespaces,
    "nosummary" => Key::NoSummary,
    "page" => Key::Page,
    "placeholder" => Key::Placeholder,
    "prefix" => Key::Prefix,
    "preload" => Key::Preload,
    "searchbuttonlabel" => Key::SearchButtonLabel,
    "searchfilter" => Key::SearchFilter,
    "summary" => Key::Summary,
    "tour" => Key::Tour,
    "type" => Key::Type,
    "usedt" => Key::UseDt,
    "useve" => Key::UseVe,
    "width" => Key::Width,
};

/// The marker which introduces language variant markup.
const VARIANT_MARKER: &str = "-{";

/// The configuration of a single input box.
///
/// Flags which are `Option<String>` distinguish an option which was never
/// given from one given with an empty value; flags which are plain strings
/// only care about PHP truthiness.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputBox {
    /// Accessible label for the text box.
    pub aria_label: String,
    /// Background colour of the form container.
    pub bg_color: String,
    /// Label for the primary button.
    pub button_label: String,
    /// Initial value of the text box.
    pub default_text: String,
    /// Text direction of the text box.
    pub dir: Direction,
    /// Page used as the edit notice.
    pub edit_intro: Option<String>,
    /// Whether the compact search form has a full text button.
    pub full_text_button: String,
    /// Whether the text box is hidden.
    pub hidden: Option<String>,
    /// The form id.
    pub id: String,
    /// Whether the compact search form is inline.
    pub inline: Option<String>,
    /// The kind of form.
    pub kind: FormType,
    /// Label shown before the compact search form.
    pub label_text: String,
    /// Separator between the text box and the buttons.
    pub line_break: LineBreak,
    /// Whether the edit is marked minor.
    pub minor: Option<String>,
    /// Namespaces to search, comma-separated. A `**` suffix marks a namespace
    /// as checked by default.
    pub namespaces: String,
    /// Whether the summary field is hidden.
    pub no_summary: Option<String>,
    /// Target page for move and new section forms.
    pub page: String,
    /// Placeholder text of the text box.
    pub placeholder: String,
    /// Prefix prepended to the submitted title.
    pub prefix: String,
    /// Page used as the initial content.
    pub preload: Option<String>,
    /// Parameters substituted into the preloaded content, in order.
    pub preload_params: Vec<String>,
    /// Label for the full text search button.
    pub search_button_label: String,
    /// Extra search terms appended to the query.
    pub search_filter: String,
    /// Edit summary.
    pub summary: Option<String>,
    /// Guided tour to launch.
    pub tour: String,
    /// Whether new sections are preloaded by DiscussionTools.
    pub use_dt: Option<String>,
    /// Whether to edit with VisualEditor.
    pub use_ve: Option<String>,
    /// Width of the text box, in characters.
    pub width: u32,
}

impl InputBox {
    /// The default text box width.
    pub const DEFAULT_WIDTH: u32 = 50;

    /// Creates an input box with default options.
    fn new(dir: Direction) -> Self {
        Self {
            aria_label: String::new(),
            bg_color: "transparent".into(),
            button_label: String::new(),
            default_text: String::new(),
            dir,
            edit_intro: None,
            full_text_button: String::new(),
            hidden: Some(String::new()),
            id: String::new(),
            inline: None,
            kind: FormType::Missing,
            label_text: String::new(),
            line_break: LineBreak::Br,
            minor: None,
            namespaces: String::new(),
            no_summary: None,
            page: String::new(),
            placeholder: String::new(),
            prefix: String::new(),
            preload: None,
            preload_params: Vec::new(),
            search_button_label: String::new(),
            search_filter: String::new(),
            summary: None,
            tour: String::new(),
            use_dt: None,
            use_ve: None,
            width: Self::DEFAULT_WIDTH,
        }
    }

    /// Parses the body of an `<inputbox>` tag.
    ///
    /// Each line is a `name=value` pair. Lines without `=` and unknown names
    /// are ignored, later values replace earlier ones, and every
    /// `preloadparams[]` line is kept.
    pub fn parse<H: Host + ?Sized>(text: &str, host: &H) -> Self {
        let mut this = Self::new(host.page_dir());

        let mut values = IndexMap::<String, String>::new();
        for line in text.split('\n') {
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };

            let name = trim(name).to_ascii_lowercase();
            let value = decode_html(trim(value)).into_owned();
            if name == "preloadparams[]" {
                this.preload_params.push(value);
            } else {
                values.insert(name, value);
            }
        }

        if let Some(dir) = values.get("dir")
            && Direction::from_attribute(dir).is_none()
        {
            log::debug!("ignoring invalid dir {dir:?}");
            values.shift_remove("dir");
        }

        for (name, value) in values {
            let Some(key) = OPTIONS.get(name.as_str()).copied() else {
                log::debug!("ignoring unknown option {name:?}");
                continue;
            };

            let value = if key.is_convertible() && host.has_variants() && value.contains(VARIANT_MARKER) {
                host.convert(&value)
            } else {
                value
            };

            this.set(key, value);
        }

        let target = if this.kind == FormType::CommentTitle {
            &this.page
        } else {
            &this.default_text
        };
        if is_truthy_opt(this.hidden.as_deref())
            && is_truthy_opt(this.preload.as_deref())
            && target.ends_with(".js")
        {
            log::debug!("unhiding text box for script page {target:?}");
            this.hidden = None;
        }

        this
    }

    /// Assigns a single option, normalising its value.
    fn set(&mut self, key: Key, value: String) {
        match key {
            Key::AriaLabel => self.aria_label = value,
            Key::BgColor => {
                if value.is_empty() || !is_valid_color(&value) {
                    if !value.is_empty() {
                        log::debug!("ignoring invalid bgcolor {value:?}");
                    }
                    self.bg_color = "transparent".into();
                } else {
                    self.bg_color = value;
                }
            }
            Key::Break => self.line_break = LineBreak::from_option(&value),
            Key::ButtonLabel => self.button_label = value,
            Key::Default => self.default_text = value,
            Key::Dir => {
                if let Some(dir) = Direction::from_attribute(&value) {
                    self.dir = dir;
                }
            }
            Key::EditIntro => self.edit_intro = Some(value),
            Key::FullTextButton => self.full_text_button = value,
            Key::Hidden => self.hidden = Some(value),
            Key::Id => self.id = value,
            Key::Inline => self.inline = Some(value),
            Key::LabelText => self.label_text = value,
            Key::Minor => self.minor = Some(value),
            Key::Namespaces => self.namespaces = value,
            Key::NoSummary => self.no_summary = Some(value),
            Key::Page => self.page = value,
            Key::Placeholder => self.placeholder = value,
            Key::Prefix => self.prefix = value,
            Key::Preload => self.preload = Some(value),
            Key::SearchButtonLabel => self.search_button_label = value,
            Key::SearchFilter => self.search_filter = value,
            Key::Summary => self.summary = Some(value),
            Key::Tour => self.tour = value,
            Key::Type => self.kind = FormType::from_option(&value),
            Key::UseDt => self.use_dt = Some(value),
            Key::UseVe => self.use_ve = Some(value),
            Key::Width => self.width = normalize_width(&value),
        }
    }

    /// Renders the form as HTML. Invalid configurations render an error
    /// message instead.
    pub fn render<H: Host + ?Sized>(&self, host: &H) -> String {
        let mut out = String::new();
        let result = match &self.kind {
            FormType::Create | FormType::Comment => forms::create(&mut out, self, host),
            FormType::Move => forms::move_page(&mut out, self, host),
            FormType::CommentTitle => forms::comment_title(&mut out, self, host),
            FormType::Search | FormType::FullText => forms::search(&mut out, self, host),
            FormType::Search2 => forms::search2(&mut out, self, host),
            FormType::Missing => {
                forms::error(&mut out, &host.message("inputbox-error-no-type", &[]))
            }
            FormType::Unknown(kind) => {
                forms::error(&mut out, &host.message("inputbox-error-bad-type", &[kind.as_str()]))
            }
        };

        if let Err(err) = result {
            log::error!("failed to render {:?} input box: {err}", self.kind);
            out.clear();
            if forms::error(&mut out, &host.message("inputbox-error-no-type", &[])).is_err() {
                out.clear();
            }
        }

        out
    }
}

/// The output of an `<inputbox>` tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rendered {
    /// The form HTML.
    pub html: String,
    /// Style modules required by the HTML.
    pub module_styles: &'static [&'static str],
}

/// Parses and renders the body of an `<inputbox>` tag.
pub fn render_tag<H: Host + ?Sized>(body: &str, host: &H) -> Rendered {
    Rendered {
        html: InputBox::parse(body, host).render(host),
        module_styles: MODULE_STYLES,
    }
}

/// Converts a `width` option to a positive width.
fn normalize_width(value: &str) -> u32 {
    let width = intval(value);
    if width <= 0 {
        log::debug!("ignoring invalid width {value:?}");
        InputBox::DEFAULT_WIDTH
    } else {
        u32::try_from(width).unwrap_or(u32::MAX)
    }
}

/// Returns true if `color` is a colour name, a hexadecimal colour, or an
/// `rgb()` colour.
fn is_valid_color(color: &str) -> bool {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        RegexBuilder::new(
            r"(?x)
            ^(
                [a-zA-Z]*                   # colour name
                | \#[0-9a-f]{3}             # short hexadecimal
                | \#[0-9a-f]{6}             # long hexadecimal
                | rgb\s*\(\s*(
                    [0-9]+\s*,\s*[0-9]+\s*,\s*[0-9]+
                    | [0-9.]+%\s*,\s*[0-9.]+%\s*,\s*[0-9.]+%
                )\s*\)
            )$",
        )
        .case_insensitive(true)
        .build()
        .unwrap()
    });

    RE.is_match(color)
}

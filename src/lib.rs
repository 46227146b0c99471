//! Standalone pieces of MediaWiki: the `<inputbox>` form renderer and the
//! resolver which splits page titles from a foreign wiki's XML dump into
//! namespace and page name.

pub mod common;
pub mod config;
pub mod host;
pub mod html;
pub mod inputbox;
pub mod php;
pub mod title;

pub use config::SiteConfig;
pub use host::{Host, SiteHost};
pub use inputbox::{InputBox, Rendered, render_tag};
pub use title::{
    ForeignTitle, ForeignTitleFactory, NaiveForeignTitleFactory, NamespaceAwareForeignTitleFactory,
};

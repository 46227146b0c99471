//! MediaWiki site configuration.
//!
//! Forms cannot be rendered without out-of-band configuration data: the
//! namespace table (for namespace-filtered search forms and foreign title
//! resolution), the entry point URLs, and the content language direction.
//! All of this can be acquired by querying the MediaWiki API for a given
//! installation (see the `fetch-config` binary); if no such data is
//! supplied, the defaults for English Wikipedia are used.

use crate::title::{Namespace, NamespaceIndex};
use indexmap::IndexMap;
use std::path::Path;

/// A site configuration error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("could not read site configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file was not a valid siteinfo document.
    #[error("invalid siteinfo: {0}")]
    Json(#[from] serde_json::Error),
    /// The siteinfo document had no main namespace.
    #[error("siteinfo has no main namespace")]
    MissingMainNamespace,
}

/// Text direction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

impl Direction {
    /// Parses an HTML `dir` value. Only the exact strings `ltr` and `rtl` are
    /// valid.
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "ltr" => Some(Self::Ltr),
            "rtl" => Some(Self::Rtl),
            _ => None,
        }
    }

    /// The HTML `dir` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configuration of a single wiki.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// The article path, where `$1` is replaced by the URL-encoded title.
    pub article_path: String,
    /// The content language direction.
    pub dir: Direction,
    /// Site-wide namespace aliases which apply in addition to the aliases in
    /// the namespace table.
    pub namespace_aliases: IndexMap<String, i32>,
    /// All namespaces for this installation.
    pub namespaces: Vec<Namespace>,
    /// The path of the main script entry point.
    pub script: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let namespaces = DEFAULT_NAMESPACES
            .iter()
            .map(|(id, name, canonical, aliases)| Namespace {
                id: *id,
                name: (*name).to_string(),
                canonical: canonical.map(str::to_string),
                aliases: aliases.iter().map(|alias| (*alias).to_string()).collect(),
            })
            .collect();

        Self {
            article_path: "/wiki/$1".into(),
            dir: Direction::Ltr,
            namespace_aliases: IndexMap::new(),
            namespaces,
            script: "/w/index.php".into(),
        }
    }
}

impl SiteConfig {
    /// Loads a configuration from a `siteinfo` API response document which
    /// contains at least the `general`, `namespaces`, and `namespacealiases`
    /// properties.
    pub fn from_siteinfo_json(json: &str) -> Result<Self, Error> {
        let response = serde_json::from_str::<api::Response>(json)?;
        let api::Query {
            general,
            mut namespaces,
            namespace_aliases,
        } = response.query;

        if !namespaces.values().any(|ns| ns.id == Namespace::MAIN) {
            return Err(Error::MissingMainNamespace);
        }

        for api::NamespaceAlias { id, alias } in namespace_aliases {
            if let Some(ns) = namespaces.values_mut().find(|ns| ns.id == id) {
                ns.aliases.push(alias);
            } else {
                log::warn!("alias '{alias}' refers to unknown namespace {id}");
            }
        }

        let default = Self::default();
        Ok(Self {
            article_path: general.article_path.unwrap_or(default.article_path),
            dir: if general.rtl {
                Direction::Rtl
            } else {
                Direction::Ltr
            },
            namespace_aliases: IndexMap::new(),
            namespaces: namespaces.into_values().collect(),
            script: general.script.unwrap_or(default.script),
        })
    }

    /// Loads a configuration from a `siteinfo` JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_siteinfo_json(&json)
    }

    /// Finds the namespace with the given numeric ID.
    pub fn find_namespace_by_id(&self, id: i32) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.id == id)
    }

    /// Finds the namespace with the given case-insensitive name. Searches the
    /// name, canonical name, all aliases, and the site-wide aliases.
    pub fn find_namespace_by_name(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.is_named(name)).or_else(|| {
            self.namespace_aliases
                .iter()
                .find(|(alias, _)| crate::title::names_match(alias, name))
                .and_then(|(_, id)| self.find_namespace_by_id(*id))
        })
    }

    /// Returns the display name of the special namespace.
    pub fn special_namespace_name(&self) -> &str {
        self.find_namespace_by_id(Namespace::SPECIAL)
            .map_or("Special", |ns| &ns.name)
    }
}

impl NamespaceIndex for SiteConfig {
    fn ns_index(&self, name: &str) -> Option<i32> {
        self.find_namespace_by_name(name).map(|ns| ns.id)
    }
}

/// Namespaces of English Wikipedia: (id, name, canonical name, aliases).
#[rustfmt::skip]
static DEFAULT_NAMESPACES: &[(i32, &str, Option<&str>, &[&str])] = &[
    (Namespace::MEDIA, "Media", Some("Media"), &[]),
    (Namespace::SPECIAL, "Special", Some("Special"), &[]),
    (Namespace::MAIN, "", None, &[]),
    (Namespace::TALK, "Talk", Some("Talk"), &[]),
    (Namespace::USER, "User", Some("User"), &[]),
    (3, "User talk", Some("User talk"), &[]),
    (Namespace::PROJECT, "Wikipedia", Some("Project"), &["WP"]),
    (5, "Wikipedia talk", Some("Project talk"), &["WT"]),
    (Namespace::FILE, "File", Some("File"), &["Image"]),
    (7, "File talk", Some("File talk"), &["Image talk"]),
    (8, "MediaWiki", Some("MediaWiki"), &[]),
    (9, "MediaWiki talk", Some("MediaWiki talk"), &[]),
    (Namespace::TEMPLATE, "Template", Some("Template"), &["TM"]),
    (11, "Template talk", Some("Template talk"), &[]),
    (Namespace::HELP, "Help", Some("Help"), &[]),
    (13, "Help talk", Some("Help talk"), &[]),
    (Namespace::CATEGORY, "Category", Some("Category"), &[]),
    (15, "Category talk", Some("Category talk"), &[]),
    (100, "Portal", Some("Portal"), &[]),
    (101, "Portal talk", Some("Portal talk"), &[]),
    (118, "Draft", Some("Draft"), &[]),
    (119, "Draft talk", Some("Draft talk"), &[]),
    (126, "MOS", Some("MOS"), &[]),
    (127, "MOS talk", Some("MOS talk"), &[]),
    (710, "TimedText", Some("TimedText"), &[]),
    (711, "TimedText talk", Some("TimedText talk"), &[]),
    (828, "Module", Some("Module"), &[]),
    (829, "Module talk", Some("Module talk"), &[]),
    (1728, "Event", Some("Event"), &[]),
    (1729, "Event talk", Some("Event talk"), &[]),
];

/// The subset of the MediaWiki `action=query&meta=siteinfo` response which is
/// needed to build a [`SiteConfig`].
mod api {
    use crate::title::Namespace;
    use std::collections::BTreeMap;

    #[derive(serde::Deserialize)]
    pub(super) struct Response {
        pub query: Query,
    }

    #[derive(serde::Deserialize)]
    pub(super) struct General {
        #[serde(rename = "articlepath")]
        pub article_path: Option<String>,
        #[serde(default)]
        pub rtl: bool,
        pub script: Option<String>,
    }

    #[derive(serde::Deserialize)]
    pub(super) struct NamespaceAlias {
        pub id: i32,
        pub alias: String,
    }

    #[derive(serde::Deserialize)]
    pub(super) struct Query {
        pub general: General,
        pub namespaces: BTreeMap<String, Namespace>,
        #[serde(rename = "namespacealiases", default)]
        pub namespace_aliases: Vec<NamespaceAlias>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEINFO: &str = r#"{
        "batchcomplete": true,
        "query": {
            "general": {
                "articlepath": "/wiki/$1",
                "script": "/w/index.php",
                "rtl": true
            },
            "namespaces": {
                "-1": { "id": -1, "case": "first-letter", "name": "מיוחד", "canonical": "Special" },
                "0": { "id": 0, "case": "first-letter", "name": "", "content": true },
                "1": { "id": 1, "case": "first-letter", "name": "שיחה", "canonical": "Talk" }
            },
            "namespacealiases": [
                { "id": 1, "alias": "ש" }
            ]
        }
    }"#;

    #[test]
    fn defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.ns_index("Talk"), Some(1));
        assert_eq!(config.ns_index("user_talk"), Some(3));
        assert_eq!(config.ns_index("Project"), Some(4));
        assert_eq!(config.ns_index("image"), Some(6));
        assert_eq!(config.ns_index("Bogus"), None);
        assert_eq!(config.special_namespace_name(), "Special");
    }

    #[test]
    fn site_aliases() {
        let mut config = SiteConfig::default();
        config.namespace_aliases.insert("Cat".into(), Namespace::CATEGORY);
        assert_eq!(config.ns_index("cat"), Some(Namespace::CATEGORY));
        assert_eq!(
            config.find_namespace_by_name("Cat").map(|ns| ns.name.as_str()),
            Some("Category")
        );
    }

    #[test]
    fn siteinfo() {
        let config = SiteConfig::from_siteinfo_json(SITEINFO).unwrap();
        assert_eq!(config.dir, Direction::Rtl);
        assert_eq!(config.script, "/w/index.php");
        assert_eq!(config.ns_index("שיחה"), Some(1));
        assert_eq!(config.ns_index("talk"), Some(1));
        assert_eq!(config.ns_index("ש"), Some(1));
        assert_eq!(config.special_namespace_name(), "מיוחד");
    }

    #[test]
    fn siteinfo_errors() {
        assert!(matches!(
            SiteConfig::from_siteinfo_json("{"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            SiteConfig::from_siteinfo_json(
                r#"{ "query": { "general": {}, "namespaces": {} } }"#
            ),
            Err(Error::MissingMainNamespace)
        ));
    }

    #[test]
    fn direction() {
        assert_eq!(Direction::from_attribute("rtl"), Some(Direction::Rtl));
        assert_eq!(Direction::from_attribute("RTL"), None);
        assert_eq!(Direction::Ltr.to_string(), "ltr");
    }
}

//! Types and functions for namespaces and for page titles which come from a
//! foreign wiki, e.g. the `<title>` and `<ns>` elements of an XML dump.

use std::{borrow::Cow, collections::HashMap};
use unicase::UniCase;

/// An article namespace.
#[derive(Clone, Debug, Eq, serde::Deserialize)]
pub struct Namespace {
    /// The namespace ID.
    pub id: i32,
    /// The display name of the namespace.
    pub name: String,
    /// The canonical name of the namespace.
    ///
    /// For example, the canonical 'Project' namespace, present on all MW
    /// installations, is normally given a display name matching the name of the
    /// wiki.
    #[serde(default)]
    pub canonical: Option<String>,
    /// Named aliases for the namespace.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Namespace {
    /// The special namespace ID used for direct links to media files.
    pub const MEDIA: i32 = -2;
    /// The special namespace ID used for dynamic pages.
    pub const SPECIAL: i32 = -1;
    /// The main namespace ID.
    pub const MAIN: i32 = 0;
    /// The talk namespace ID.
    pub const TALK: i32 = 1;
    /// The user namespace ID.
    pub const USER: i32 = 2;
    /// The project namespace ID.
    pub const PROJECT: i32 = 4;
    /// The file namespace ID.
    pub const FILE: i32 = 6;
    /// The template namespace ID.
    pub const TEMPLATE: i32 = 10;
    /// The help namespace ID.
    pub const HELP: i32 = 12;
    /// The category namespace ID.
    pub const CATEGORY: i32 = 14;

    /// Returns true if `name` refers to this namespace by its display name,
    /// canonical name, or any alias.
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
            || self
                .canonical
                .as_deref()
                .is_some_and(|canonical| names_match(canonical, name))
            || self.aliases.iter().any(|alias| names_match(alias, name))
    }
}

/// Compares two namespace names the way MediaWiki does when resolving a
/// namespace index: case-insensitively, with spaces and underscores treated as
/// the same character.
pub fn names_match(a: &str, b: &str) -> bool {
    fn key(name: &str) -> Cow<'_, str> {
        if name.contains('_') {
            Cow::Owned(name.replace('_', " "))
        } else {
            Cow::Borrowed(name)
        }
    }

    UniCase::new(key(a)) == UniCase::new(key(b))
}

/// A source of local namespace IDs.
pub trait NamespaceIndex {
    /// Returns the ID of the namespace with the given name or alias, if the
    /// name is known.
    fn ns_index(&self, name: &str) -> Option<i32>;
}

impl NamespaceIndex for [Namespace] {
    fn ns_index(&self, name: &str) -> Option<i32> {
        self.iter().find(|ns| ns.is_named(name)).map(|ns| ns.id)
    }
}

impl NamespaceIndex for Vec<Namespace> {
    fn ns_index(&self, name: &str) -> Option<i32> {
        self.as_slice().ns_index(name)
    }
}

/// A page title from a foreign wiki.
///
/// The namespace name is whatever the foreign wiki called it and may not
/// exist locally at all. The page name is not normalised in any way.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForeignTitle {
    /// The foreign namespace ID, if it was known.
    namespace_id: Option<i32>,
    /// The foreign namespace name. Empty for the main namespace or when the
    /// title has no recognisable namespace part.
    namespace_name: String,
    /// The page name without the namespace part.
    page_name: String,
}

impl ForeignTitle {
    /// Creates a new foreign title from its parts.
    pub fn new(
        namespace_id: Option<i32>,
        namespace_name: impl Into<String>,
        page_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace_id,
            namespace_name: namespace_name.into(),
            page_name: page_name.into(),
        }
    }

    /// Returns true if the foreign namespace ID is known.
    #[inline]
    pub fn is_namespace_id_known(&self) -> bool {
        self.namespace_id.is_some()
    }

    /// The foreign namespace ID, if known.
    #[inline]
    pub fn namespace_id(&self) -> Option<i32> {
        self.namespace_id
    }

    /// The foreign namespace name.
    ///
    /// ```text
    /// Namespace:Title/Sub/Page
    /// ^^^^^^^^^
    /// ```
    #[inline]
    pub fn namespace_name(&self) -> &str {
        &self.namespace_name
    }

    /// The page name.
    ///
    /// ```text
    /// Namespace:Title/Sub/Page
    ///           ^^^^^^^^^^^^^^
    /// ```
    #[inline]
    pub fn text(&self) -> &str {
        &self.page_name
    }

    /// The full text of the title.
    ///
    /// ```text
    /// Namespace:Title/Sub/Page
    /// ^^^^^^^^^^^^^^^^^^^^^^^^
    /// ```
    pub fn full_text(&self) -> Cow<'_, str> {
        if self.namespace_name.is_empty() {
            Cow::Borrowed(&self.page_name)
        } else {
            Cow::Owned(format!("{}:{}", self.namespace_name, self.page_name))
        }
    }
}

impl core::fmt::Display for ForeignTitle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(id) = self.namespace_id {
            write!(f, "{{ns{id}}}")?;
        } else {
            f.write_str("{ns??}")?;
        }
        write!(f, "{}:{}", self.namespace_name, self.page_name)
    }
}

/// A parser which turns a foreign page title plus optional namespace ID into
/// a [`ForeignTitle`].
pub trait ForeignTitleFactory {
    /// Creates a [`ForeignTitle`] from a page title and, if available, the
    /// namespace ID of that page on the foreign wiki.
    fn create_foreign_title(&self, title: &str, ns: Option<i32>) -> ForeignTitle;
}

/// Splits a foreign title into its namespace and page parts, with no knowledge
/// of the namespace setup on the foreign site.
///
/// If `ns` is known, a non-zero ID means the part before the first colon is a
/// namespace name. If `ns` is not known (XML export schema 0.5 and earlier has
/// no `<ns>` element), the part before the colon is a namespace name only if
/// `local` recognises it.
pub fn resolve<I: NamespaceIndex + ?Sized>(title: &str, ns: Option<i32>, local: &I) -> ForeignTitle {
    let split = title.split_once(':');
    let prefix = split.map_or(title, |(prefix, _)| prefix);

    let is_namespace_part_valid = match ns {
        None => local.ns_index(prefix).is_some(),
        Some(id) => id != 0,
    };

    match split {
        Some((namespace_name, page_name)) if is_namespace_part_valid => {
            ForeignTitle::new(ns, namespace_name, page_name)
        }
        _ => ForeignTitle::new(ns, "", title),
    }
}

/// A [`ForeignTitleFactory`] which uses the local wiki's namespaces to guess
/// at the foreign namespace structure.
pub struct NaiveForeignTitleFactory<'a, I: NamespaceIndex + ?Sized> {
    /// The local namespace index.
    local: &'a I,
}

impl<'a, I: NamespaceIndex + ?Sized> NaiveForeignTitleFactory<'a, I> {
    /// Creates a new factory which falls back to the given local namespaces.
    pub fn new(local: &'a I) -> Self {
        Self { local }
    }
}

impl<I: NamespaceIndex + ?Sized> ForeignTitleFactory for NaiveForeignTitleFactory<'_, I> {
    fn create_foreign_title(&self, title: &str, ns: Option<i32>) -> ForeignTitle {
        resolve(title, ns, self.local)
    }
}

/// A [`ForeignTitleFactory`] which knows the namespace names of the foreign
/// wiki, e.g. from the `<siteinfo>` element of an XML dump.
pub struct NamespaceAwareForeignTitleFactory<'a, I: NamespaceIndex + ?Sized> {
    /// Foreign namespace names keyed by ID, if the dump supplied them.
    foreign: Option<HashMap<i32, String>>,
    /// Fallback used when no foreign namespace data exists.
    naive: NaiveForeignTitleFactory<'a, I>,
}

impl<'a, I: NamespaceIndex + ?Sized> NamespaceAwareForeignTitleFactory<'a, I> {
    /// Creates a new factory from the foreign namespace map. If `foreign` is
    /// `None`, this behaves like [`NaiveForeignTitleFactory`] using `local`.
    pub fn new(foreign: Option<HashMap<i32, String>>, local: &'a I) -> Self {
        Self {
            foreign,
            naive: NaiveForeignTitleFactory::new(local),
        }
    }

    /// Splits a title with no namespace ID by matching its prefix against the
    /// foreign namespace names.
    fn parse_title_no_ns(foreign: &HashMap<i32, String>, title: &str) -> ForeignTitle {
        if let Some((prefix, page_name)) = title.split_once(':')
            && let Some((id, name)) = foreign
                .iter()
                .find(|(id, name)| **id != Namespace::MAIN && names_match(name, prefix))
        {
            ForeignTitle::new(Some(*id), name.clone(), page_name)
        } else {
            ForeignTitle::new(Some(Namespace::MAIN), "", title)
        }
    }

    /// Splits a title with a known namespace ID.
    fn parse_title_with_ns(foreign: &HashMap<i32, String>, title: &str, ns: i32) -> ForeignTitle {
        let namespace_name = foreign.get(&ns).map_or("", String::as_str);
        match title.split_once(':') {
            Some((prefix, page_name))
                if ns != Namespace::MAIN && names_match(namespace_name, prefix) =>
            {
                ForeignTitle::new(Some(ns), namespace_name, page_name)
            }
            _ => {
                if ns != Namespace::MAIN {
                    log::debug!("title {title:?} does not start with foreign namespace {ns}");
                }
                ForeignTitle::new(Some(ns), namespace_name, title)
            }
        }
    }
}

impl<I: NamespaceIndex + ?Sized> ForeignTitleFactory for NamespaceAwareForeignTitleFactory<'_, I> {
    fn create_foreign_title(&self, title: &str, ns: Option<i32>) -> ForeignTitle {
        let Some(foreign) = &self.foreign else {
            return self.naive.create_foreign_title(title, ns);
        };

        match ns {
            Some(ns) => Self::parse_title_with_ns(foreign, title, ns),
            None => Self::parse_title_no_ns(foreign, title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> Vec<Namespace> {
        vec![
            Namespace {
                id: 0,
                name: String::new(),
                canonical: None,
                aliases: vec![],
            },
            Namespace {
                id: 1,
                name: "Talk".into(),
                canonical: Some("Talk".into()),
                aliases: vec![],
            },
            Namespace {
                id: 4,
                name: "Wikipedia".into(),
                canonical: Some("Project".into()),
                aliases: vec!["WP".into()],
            },
            Namespace {
                id: 5,
                name: "Wikipedia talk".into(),
                canonical: Some("Project talk".into()),
                aliases: vec!["WT".into()],
            },
        ]
    }

    #[test]
    fn resolve_unknown_ns() {
        let local = local();
        assert_eq!(
            resolve("Talk:Foo", None, &local),
            ForeignTitle::new(None, "Talk", "Foo")
        );
        assert_eq!(
            resolve("Bogus:Foo", None, &local),
            ForeignTitle::new(None, "", "Bogus:Foo")
        );
        assert_eq!(
            resolve("Foo", None, &local),
            ForeignTitle::new(None, "", "Foo")
        );
        assert_eq!(
            resolve("project_talk:Foo:Bar", None, &local),
            ForeignTitle::new(None, "project_talk", "Foo:Bar"),
            "prefix should be kept verbatim"
        );
        assert_eq!(
            resolve("WP:Foo", None, &local),
            ForeignTitle::new(None, "WP", "Foo"),
            "aliases should be recognised"
        );
    }

    #[test]
    fn resolve_known_ns() {
        let local = local();
        assert_eq!(
            resolve("Talk:Foo", Some(1), &local),
            ForeignTitle::new(Some(1), "Talk", "Foo")
        );
        assert_eq!(
            resolve("Talk:Foo", Some(0), &local),
            ForeignTitle::new(Some(0), "", "Talk:Foo")
        );
        assert_eq!(
            resolve("Bogus:Foo", Some(100), &local),
            ForeignTitle::new(Some(100), "Bogus", "Foo"),
            "non-zero ns should trust the prefix even if it is unknown locally"
        );
        assert_eq!(
            resolve("Foo", Some(100), &local),
            ForeignTitle::new(Some(100), "", "Foo"),
            "a title without a colon has no namespace part"
        );
    }

    #[test]
    fn accessors() {
        let title = ForeignTitle::new(Some(1), "Talk", "Foo bar");
        assert!(title.is_namespace_id_known());
        assert_eq!(title.namespace_id(), Some(1));
        assert_eq!(title.namespace_name(), "Talk");
        assert_eq!(title.text(), "Foo bar");
        assert_eq!(title.full_text(), "Talk:Foo bar");
        assert_eq!(title.to_string(), "{ns1}Talk:Foo bar");

        let title = ForeignTitle::new(None, "", "Foo");
        assert!(!title.is_namespace_id_known());
        assert_eq!(title.full_text(), Cow::Borrowed("Foo"));
        assert_eq!(title.to_string(), "{ns??}:Foo");
    }

    #[test]
    fn namespace_aware() {
        let local = local();
        let foreign = HashMap::from([
            (0, String::new()),
            (1, "Diskussion".to_string()),
            (100, "Portal".to_string()),
        ]);
        let factory = NamespaceAwareForeignTitleFactory::new(Some(foreign), &local);

        assert_eq!(
            factory.create_foreign_title("Diskussion:Foo", None),
            ForeignTitle::new(Some(1), "Diskussion", "Foo")
        );
        assert_eq!(
            factory.create_foreign_title("Talk:Foo", None),
            ForeignTitle::new(Some(0), "", "Talk:Foo"),
            "local names should not be used when foreign names are known"
        );
        assert_eq!(
            factory.create_foreign_title("portal:Foo", Some(100)),
            ForeignTitle::new(Some(100), "Portal", "Foo")
        );
        assert_eq!(
            factory.create_foreign_title("Foo", Some(100)),
            ForeignTitle::new(Some(100), "Portal", "Foo")
        );
        assert_eq!(
            factory.create_foreign_title("Portal:Foo", Some(0)),
            ForeignTitle::new(Some(0), "", "Portal:Foo")
        );

        let naive = NamespaceAwareForeignTitleFactory::new(None, &local);
        assert_eq!(
            naive.create_foreign_title("Talk:Foo", None),
            ForeignTitle::new(None, "Talk", "Foo")
        );
    }

    #[test]
    fn matching() {
        assert!(names_match("User talk", "user_talk"));
        assert!(names_match("Wikipedia", "WIKIPEDIA"));
        assert!(!names_match("User", "User talk"));
    }
}

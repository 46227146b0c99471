//! Services which a wiki installation provides to the form renderer.

use crate::{
    common::{message, url_encode},
    config::{Direction, SiteConfig},
};
use rand::{Rng as _, SeedableRng as _, rngs::SmallRng};
use std::{cell::RefCell, collections::HashSet};

/// Canonical special page names mapped to their display names in English.
static SPECIAL_PAGES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "movepage" => "MovePage",
    "search" => "Search",
};

/// The capabilities of a wiki which are needed to render forms.
///
/// Everything except [`Host::site`] and [`Host::random`] has a default which
/// matches a plain English wiki with no extra extensions.
pub trait Host {
    /// The site configuration.
    fn site(&self) -> &SiteConfig;

    /// Returns a uniformly distributed number in `[0, 1)`, used to make
    /// element ids unique on a page.
    fn random(&self) -> f64;

    /// Formats a message in the user language.
    fn message(&self, key: &str, params: &[&str]) -> String {
        message(key, params)
    }

    /// Formats a message in the content language.
    fn content_message(&self, key: &str, params: &[&str]) -> String {
        self.message(key, params)
    }

    /// Returns true if the content language has variants.
    fn has_variants(&self) -> bool {
        false
    }

    /// Converts text containing variant markup into the preferred variant.
    fn convert(&self, text: &str) -> String {
        text.to_string()
    }

    /// Returns true if the extension with the given name is installed.
    fn is_extension_loaded(&self, _name: &str) -> bool {
        false
    }

    /// Renders a line of wikitext as inline HTML.
    fn parse_inline(&self, text: &str) -> String {
        html_escape::encode_text(text).into_owned()
    }

    /// The text direction of the page being rendered.
    fn page_dir(&self) -> Direction {
        self.site().dir
    }

    /// The path of the main script entry point.
    fn script(&self) -> &str {
        &self.site().script
    }

    /// Returns the prefixed text of a special page title, e.g.
    /// `Special:MovePage/Foo`. An empty `subpage` is omitted.
    fn special_page_title(&self, name: &str, subpage: &str) -> String {
        let name = SPECIAL_PAGES
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(name);
        let ns = self.site().special_namespace_name();
        if subpage.is_empty() {
            format!("{ns}:{name}")
        } else {
            format!("{ns}:{name}/{subpage}")
        }
    }

    /// Returns the local URL of a special page.
    fn special_page_url(&self, name: &str) -> String {
        let title = self.special_page_title(name, "").replace(' ', "_");
        self.site()
            .article_path
            .replace("$1", &url_encode(&title).to_string())
    }
}

/// A [`Host`] backed by a [`SiteConfig`] and the bundled English messages.
pub struct SiteHost {
    /// Names of installed extensions.
    extensions: HashSet<String>,
    /// The id randomness source.
    rng: RefCell<SmallRng>,
    /// The site configuration.
    site: SiteConfig,
}

impl SiteHost {
    /// Creates a new host for the given site with no extensions installed.
    pub fn new(site: SiteConfig) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |time| time.as_nanos() as u64);
        Self {
            extensions: HashSet::new(),
            rng: RefCell::new(SmallRng::seed_from_u64(seed)),
            site,
        }
    }

    /// Marks the named extension as installed.
    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.insert(name.into());
        self
    }

    /// Reseeds the random number generator so that generated ids are
    /// reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        self.rng.replace(SmallRng::seed_from_u64(seed));
        self
    }
}

impl Default for SiteHost {
    fn default() -> Self {
        Self::new(SiteConfig::default())
    }
}

impl Host for SiteHost {
    fn site(&self) -> &SiteConfig {
        &self.site
    }

    fn random(&self) -> f64 {
        self.rng.borrow_mut().random::<f64>()
    }

    fn is_extension_loaded(&self, name: &str) -> bool {
        self.extensions.contains(name)
    }
}

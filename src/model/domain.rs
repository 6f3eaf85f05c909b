use crate::url::extract_domain;
use std::fmt;

/// A throttling and grouping key: the last two labels of a URL's host
///
/// Pages on the same domain share one domain node in the graph store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    pub name: String,
}

impl Domain {
    /// Creates a domain from an already extracted name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Derives the domain of a URL
    ///
    /// Returns None if the URL has no host with at least two labels.
    pub fn of_url(url: &str) -> Option<Self> {
        extract_domain(url).map(Self::new)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

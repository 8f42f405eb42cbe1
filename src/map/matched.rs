//! Lookup results.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::pattern::{PartialUrl, SinglePartialUrl};

/// The result of a successful [`crate::PartialUrlMap::get`].
///
/// Immutable record of the registered pattern that matched, the single
/// combination of it that matched, the fully resolved URL, and the stored
/// value.
#[derive(Debug)]
pub struct PartialUrlMatch<V> {
    partial: Arc<PartialUrl>,
    single: SinglePartialUrl,
    url: Url,
    value: Arc<V>,
}

impl<V> PartialUrlMatch<V> {
    pub(crate) fn new(
        partial: Arc<PartialUrl>,
        single: SinglePartialUrl,
        url: Url,
        value: Arc<V>,
    ) -> Self {
        Self {
            partial,
            single,
            url,
            value,
        }
    }

    /// The registered pattern that matched; possibly multi-valued.
    pub fn partial_url(&self) -> &PartialUrl {
        &self.partial
    }

    /// The single combination that matched. For a multi pattern this is one
    /// of its combinations; for a single pattern it is the pattern itself.
    pub fn single_url(&self) -> &SinglePartialUrl {
        &self.single
    }

    /// The completed URL, with absent fields filled from the field source
    /// given to the lookup.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The value registered with the pattern.
    pub fn value(&self) -> &V {
        &self.value
    }
}

// Manual impls: the derives would demand V: Clone / V: PartialEq even though
// the value is behind an Arc.
impl<V> Clone for PartialUrlMatch<V> {
    fn clone(&self) -> Self {
        Self {
            partial: Arc::clone(&self.partial),
            single: self.single.clone(),
            url: self.url.clone(),
            value: Arc::clone(&self.value),
        }
    }
}

/// Matches are equal when pattern, combination, and URL are equal and the
/// value is the same shared allocation.
impl<V> PartialEq for PartialUrlMatch<V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
            && self.partial == other.partial
            && self.single == other.single
            && self.url == other.url
    }
}

impl<V> Eq for PartialUrlMatch<V> {}

impl<V> fmt::Display for PartialUrlMatch<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.partial {
            PartialUrl::Single(single) if *single == self.single => {
                write!(f, "{} → {}", self.single, self.url)
            }
            partial => write!(f, "{} → {} → {}", partial, self.single, self.url),
        }
    }
}

//! Partial URL patterns.
//!
//! # Data Flow
//! ```text
//! PartialUrlBuilder (scalar or multi-valued fields)
//!     → SinglePartialUrl (≤1 value per field)
//!     | MultiPartialUrl  (≥2 values in some field)
//!     → combinations()   (atomic SinglePartialUrl expansion)
//!     → matches() / to_url() against a FieldSource
//! ```
//!
//! # Design Decisions
//! - Patterns are immutable value types; equality and ordering never change
//!   after construction.
//! - The specificity order (host, context path, prefix deepest-first, port,
//!   scheme) is the single source of truth for "most specific match": the
//!   fused multi matching and the indexed map lookup both reproduce it.
//! - No regex: matching is equality plus a raw string-prefix test.

pub mod multi;
pub mod single;

use std::fmt;

use url::Url;

use crate::error::{Error, FieldError};
use crate::fields::{HostAddress, Path, Port};
use crate::source::FieldSource;

pub use multi::MultiPartialUrl;
pub use single::SinglePartialUrl;

/// The http scheme.
pub const HTTP: &str = "http";

/// The https scheme.
pub const HTTPS: &str = "https";

/// Rendering of an absent scalar field.
pub(crate) const WILDCARD: &str = "*";

/// Rendering of an absent context path.
pub(crate) const NULL_CONTEXT_PATH: &str = "/*";

/// Rendering of an absent prefix.
pub(crate) const NULL_PREFIX: &str = "/**";

/// Fail-fast bound on multi-pattern expansion.
pub(crate) const MAX_COMBINATIONS: u64 = 1 << 20;

/// Whether the port is the scheme's default and is left implicit.
pub(crate) fn default_port_hidden(scheme: &str, port: u16) -> bool {
    (port == 80 && scheme.eq_ignore_ascii_case(HTTP))
        || (port == 443 && scheme.eq_ignore_ascii_case(HTTPS))
}

/// A pattern over (scheme, host, port, context path, prefix) where any field
/// may be unspecified and so match anything.
///
/// Built with [`PartialUrl::builder`], which returns the
/// [`Single`](PartialUrl::Single) variant whenever every field collapses to
/// at most one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartialUrl {
    /// At most one value per field.
    Single(SinglePartialUrl),
    /// A set of acceptable values per field.
    Multi(MultiPartialUrl),
}

impl PartialUrl {
    /// Starts building a pattern.
    pub fn builder() -> PartialUrlBuilder {
        PartialUrlBuilder::default()
    }

    /// Checks the field source against this pattern.
    ///
    /// The returned single pattern is always one of
    /// [`PartialUrl::combinations`], specifically the first one (in
    /// combination order) whose own match succeeds.
    pub fn matches(&self, source: &dyn FieldSource) -> Result<Option<SinglePartialUrl>, FieldError> {
        match self {
            Self::Single(single) => Ok(single.matches(source)?.cloned()),
            Self::Multi(multi) => multi.matches(source),
        }
    }

    /// Whether scheme, host, port, and context path are all present, making
    /// [`PartialUrl::to_url`] possible without a field source.
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Single(single) => single.is_complete(),
            Self::Multi(multi) => multi.is_complete(),
        }
    }

    /// The canonical single-pattern representative: a single pattern is its
    /// own primary; a multi pattern takes the first value of each field set.
    pub fn primary(&self) -> &SinglePartialUrl {
        match self {
            Self::Single(single) => single,
            Self::Multi(multi) => multi.primary(),
        }
    }

    /// All atomic combinations, in an order consistent with the specificity
    /// ordering (a single pattern is its only combination).
    pub fn combinations(&self) -> Result<Vec<SinglePartialUrl>, Error> {
        match self {
            Self::Single(single) => Ok(vec![single.clone()]),
            Self::Multi(multi) => multi.combinations(),
        }
    }

    /// Completes this pattern into a concrete URL, filling absent fields
    /// from the source.
    pub fn to_url(&self, source: Option<&dyn FieldSource>) -> Result<Url, Error> {
        match self {
            Self::Single(single) => single.to_url(source),
            Self::Multi(multi) => multi.to_url(source),
        }
    }
}

impl fmt::Display for PartialUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(single) => single.fmt(f),
            Self::Multi(multi) => multi.fmt(f),
        }
    }
}

impl From<SinglePartialUrl> for PartialUrl {
    fn from(single: SinglePartialUrl) -> Self {
        Self::Single(single)
    }
}

impl From<MultiPartialUrl> for PartialUrl {
    fn from(multi: MultiPartialUrl) -> Self {
        Self::Multi(multi)
    }
}

/// Builder accepting scalar or multi-valued versions of the five fields.
///
/// Values accumulate in insertion order; duplicates are discarded (schemes
/// case-insensitively, via lower-casing on entry). [`PartialUrlBuilder::build`]
/// validates context paths and prefixes and collapses to a
/// [`SinglePartialUrl`] when every field ended up with at most one value.
#[derive(Debug, Default)]
pub struct PartialUrlBuilder {
    schemes: Vec<String>,
    hosts: Vec<HostAddress>,
    ports: Vec<Port>,
    context_paths: Vec<Path>,
    prefixes: Vec<Path>,
}

impl PartialUrlBuilder {
    /// Adds a scheme to match, lower-cased.
    pub fn scheme(mut self, scheme: &str) -> Self {
        let lower = scheme.to_ascii_lowercase();
        if !self.schemes.contains(&lower) {
            self.schemes.push(lower);
        }
        self
    }

    /// Adds several schemes.
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for scheme in schemes {
            self = self.scheme(scheme.as_ref());
        }
        self
    }

    /// Adds a host to match.
    pub fn host(mut self, host: HostAddress) -> Self {
        if !self.hosts.contains(&host) {
            self.hosts.push(host);
        }
        self
    }

    /// Adds several hosts.
    pub fn hosts<I: IntoIterator<Item = HostAddress>>(mut self, hosts: I) -> Self {
        for host in hosts {
            self = self.host(host);
        }
        self
    }

    /// Adds a port to match.
    pub fn port(mut self, port: Port) -> Self {
        if !self.ports.contains(&port) {
            self.ports.push(port);
        }
        self
    }

    /// Adds several ports.
    pub fn ports<I: IntoIterator<Item = Port>>(mut self, ports: I) -> Self {
        for port in ports {
            self = self.port(port);
        }
        self
    }

    /// Adds a context path to match.
    pub fn context_path(mut self, context_path: Path) -> Self {
        if !self.context_paths.contains(&context_path) {
            self.context_paths.push(context_path);
        }
        self
    }

    /// Adds several context paths.
    pub fn context_paths<I: IntoIterator<Item = Path>>(mut self, context_paths: I) -> Self {
        for context_path in context_paths {
            self = self.context_path(context_path);
        }
        self
    }

    /// Adds a path prefix to match; must end in a separator.
    pub fn prefix(mut self, prefix: Path) -> Self {
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
        self
    }

    /// Adds several prefixes.
    pub fn prefixes<I: IntoIterator<Item = Path>>(mut self, prefixes: I) -> Self {
        for prefix in prefixes {
            self = self.prefix(prefix);
        }
        self
    }

    /// Validates and builds the pattern.
    ///
    /// Returns [`PartialUrl::Single`] when every field has at most one value
    /// after de-duplication (all fields empty yields
    /// [`SinglePartialUrl::DEFAULT`]), otherwise [`PartialUrl::Multi`].
    pub fn build(self) -> Result<PartialUrl, Error> {
        if self.schemes.len() <= 1
            && self.hosts.len() <= 1
            && self.ports.len() <= 1
            && self.context_paths.len() <= 1
            && self.prefixes.len() <= 1
        {
            let single = SinglePartialUrl::new(
                self.schemes.first().map(String::as_str),
                self.hosts.into_iter().next(),
                self.ports.into_iter().next(),
                self.context_paths.into_iter().next(),
                self.prefixes.into_iter().next(),
            )?;
            return Ok(PartialUrl::Single(single));
        }
        let multi = MultiPartialUrl::new(
            non_empty(self.schemes),
            non_empty(self.hosts),
            non_empty(self.ports),
            non_empty(self.context_paths),
            non_empty(self.prefixes),
        )?;
        Ok(PartialUrl::Multi(multi))
    }
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

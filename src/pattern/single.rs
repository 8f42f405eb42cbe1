//! The atomic pattern: at most one value per field.

use std::cmp::Ordering;
use std::fmt;

use url::Url;

use crate::error::{Error, FieldError};
use crate::fields::{HostAddress, Path, Port};
use crate::pattern::{default_port_hidden, NULL_CONTEXT_PATH, NULL_PREFIX, WILDCARD};
use crate::source::FieldSource;

/// A partial URL with at most one value per field; all fields optional.
///
/// This is the atomic, comparable, matchable unit. Immutable value type:
/// identity and equality never change after construction. Ordering is the
/// specificity order used for "most specific match wins": host, context
/// path, prefix (deepest first), port, scheme, with a present field always
/// sorting before an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SinglePartialUrl {
    scheme: Option<String>,
    host: Option<HostAddress>,
    port: Option<Port>,
    context_path: Option<Path>,
    prefix: Option<Path>,
}

impl SinglePartialUrl {
    /// The pattern with every field absent: matches every request and sorts
    /// after all other patterns.
    pub const DEFAULT: SinglePartialUrl = SinglePartialUrl {
        scheme: None,
        host: None,
        port: None,
        context_path: None,
        prefix: None,
    };

    /// Creates a single pattern, validating the context path and prefix.
    ///
    /// The scheme is lower-cased. A non-root context path must not end in a
    /// separator; a prefix must end in one.
    pub fn new(
        scheme: Option<&str>,
        host: Option<HostAddress>,
        port: Option<Port>,
        context_path: Option<Path>,
        prefix: Option<Path>,
    ) -> Result<Self, Error> {
        if let Some(context_path) = &context_path {
            validate_context_path(context_path)?;
        }
        if let Some(prefix) = &prefix {
            validate_prefix(prefix)?;
        }
        Ok(Self {
            scheme: scheme.map(str::to_ascii_lowercase),
            host,
            port,
            context_path,
            prefix,
        })
    }

    /// Builds from already-validated parts (combination expansion, fused
    /// multi matching).
    pub(crate) fn from_parts(
        scheme: Option<String>,
        host: Option<HostAddress>,
        port: Option<Port>,
        context_path: Option<Path>,
        prefix: Option<Path>,
    ) -> Self {
        Self {
            scheme,
            host,
            port,
            context_path,
            prefix,
        }
    }

    /// The lower-case scheme, or `None` when the field source's scheme
    /// applies.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// The host, or `None` when the field source's host applies.
    pub fn host(&self) -> Option<&HostAddress> {
        self.host.as_ref()
    }

    /// The port, or `None` when the field source's port applies.
    pub fn port(&self) -> Option<&Port> {
        self.port.as_ref()
    }

    /// The context path, ending in a separator only when root, or `None`
    /// when the field source's context path applies.
    pub fn context_path(&self) -> Option<&Path> {
        self.context_path.as_ref()
    }

    /// The path prefix, always ending in a separator, or `None` to match any
    /// path under the context.
    pub fn prefix(&self) -> Option<&Path> {
        self.prefix.as_ref()
    }

    /// Checks the field source against every specified field.
    ///
    /// Returns this same pattern on a match; callers may rely on the result
    /// being the pattern itself. [`SinglePartialUrl::DEFAULT`] matches
    /// without querying the source at all. The prefix is a raw string-prefix
    /// test against the source path, which must be present.
    pub fn matches(&self, source: &dyn FieldSource) -> Result<Option<&Self>, FieldError> {
        if let Some(scheme) = &self.scheme {
            if !source.scheme()?.eq_ignore_ascii_case(scheme) {
                return Ok(None);
            }
        }
        if let Some(host) = &self.host {
            if *host != source.host()? {
                return Ok(None);
            }
        }
        if let Some(port) = &self.port {
            if *port != source.port()? {
                return Ok(None);
            }
        }
        if let Some(context_path) = &self.context_path {
            if *context_path != source.context_path()? {
                return Ok(None);
            }
        }
        if let Some(prefix) = &self.prefix {
            match source.path()? {
                Some(path) if path.as_str().starts_with(prefix.as_str()) => {}
                _ => return Ok(None),
            }
        }
        Ok(Some(self))
    }

    /// Whether scheme, host, port, and context path are all present. A
    /// complete pattern can be completed into a URL without a field source.
    pub fn is_complete(&self) -> bool {
        self.scheme.is_some()
            && self.host.is_some()
            && self.port.is_some()
            && self.context_path.is_some()
    }

    /// Completes this pattern into a concrete URL.
    ///
    /// Each absent field is filled from `source`; default ports for
    /// `http`/`https` are suppressed. Fails with [`Error::MissingField`]
    /// when a field is absent and no source was supplied.
    pub fn to_url(&self, source: Option<&dyn FieldSource>) -> Result<Url, Error> {
        let scheme = match &self.scheme {
            Some(scheme) => scheme.clone(),
            None => required(source, "scheme")?.scheme()?,
        };
        let port = match &self.port {
            Some(port) => *port,
            None => required(source, "port")?.port()?,
        };
        let host = match &self.host {
            Some(host) => host.clone(),
            None => required(source, "host")?.host()?,
        };
        let context_path = match &self.context_path {
            Some(context_path) => context_path.clone(),
            None => required(source, "contextPath")?.context_path()?,
        };
        let file = build_file(&context_path, self.prefix.as_ref());
        build_url(&scheme, &host, port, &file)
    }
}

fn required<'a>(
    source: Option<&'a dyn FieldSource>,
    field: &'static str,
) -> Result<&'a dyn FieldSource, Error> {
    source.ok_or(Error::MissingField(field))
}

pub(crate) fn validate_context_path(context_path: &Path) -> Result<(), Error> {
    if !context_path.is_root() && context_path.ends_with_separator() {
        return Err(Error::ContextPathTrailingSeparator(context_path.clone()));
    }
    Ok(())
}

pub(crate) fn validate_prefix(prefix: &Path) -> Result<(), Error> {
    if !prefix.ends_with_separator() {
        return Err(Error::PrefixMissingSeparator(prefix.clone()));
    }
    Ok(())
}

/// The context-path + prefix portion of a completed URL.
pub(crate) fn build_file(context_path: &Path, prefix: Option<&Path>) -> String {
    match (context_path.is_root(), prefix) {
        (true, None) => String::new(),
        (true, Some(prefix)) => prefix.as_str().to_owned(),
        (false, None) => context_path.as_str().to_owned(),
        (false, Some(prefix)) => format!("{context_path}{prefix}"),
    }
}

/// Assembles and parses the completed URL, hiding default ports.
pub(crate) fn build_url(
    scheme: &str,
    host: &HostAddress,
    port: Port,
    file: &str,
) -> Result<Url, Error> {
    let mut url = String::with_capacity(scheme.len() + file.len() + 32);
    url.push_str(scheme);
    url.push_str("://");
    url.push_str(&host.to_bracketed_string());
    if !default_port_hidden(scheme, port.port()) {
        url.push(':');
        url.push_str(&port.port().to_string());
    }
    url.push_str(file);
    Ok(Url::parse(&url)?)
}

/// Present-before-absent comparison on one field.
fn cmp_specific<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Prefix ordering: absent last, a prefix before any of its ancestors
/// (deepest first), otherwise plain path order.
pub(crate) fn cmp_prefix(a: Option<&Path>, b: Option<&Path>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a == b {
                Ordering::Equal
            } else if a.as_str().starts_with(b.as_str()) {
                Ordering::Less
            } else if b.as_str().starts_with(a.as_str()) {
                Ordering::Greater
            } else {
                a.cmp(b)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Ord for SinglePartialUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_specific(self.host.as_ref(), other.host.as_ref())
            .then_with(|| cmp_specific(self.context_path.as_ref(), other.context_path.as_ref()))
            .then_with(|| cmp_prefix(self.prefix.as_ref(), other.prefix.as_ref()))
            .then_with(|| cmp_specific(self.port.as_ref(), other.port.as_ref()))
            .then_with(|| cmp_specific(self.scheme.as_ref(), other.scheme.as_ref()))
    }
}

impl PartialOrd for SinglePartialUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SinglePartialUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        f.write_str("//")?;
        match &self.host {
            Some(host) => f.write_str(&host.to_bracketed_string())?,
            None => f.write_str(WILDCARD)?,
        }
        match &self.port {
            None => write!(f, ":{WILDCARD}")?,
            Some(port) => {
                let hidden = self
                    .scheme
                    .as_deref()
                    .is_some_and(|scheme| default_port_hidden(scheme, port.port()));
                if !hidden {
                    write!(f, ":{}", port.port())?;
                }
            }
        }
        match &self.context_path {
            Some(context_path) if context_path.is_root() => {}
            Some(context_path) => write!(f, "{context_path}")?,
            None => f.write_str(NULL_CONTEXT_PATH)?,
        }
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}"),
            None => f.write_str(NULL_PREFIX),
        }
    }
}

//! Multi-valued patterns and their decomposition into single combinations.

use std::fmt;

use url::Url;

use crate::error::{Error, FieldError};
use crate::fields::path::SEPARATOR;
use crate::fields::{HostAddress, Path, Port};
use crate::pattern::single::{
    build_file, build_url, cmp_prefix, validate_context_path, validate_prefix,
};
use crate::pattern::{default_port_hidden, MAX_COMBINATIONS, NULL_CONTEXT_PATH, NULL_PREFIX, WILDCARD};
use crate::pattern::single::SinglePartialUrl;
use crate::source::FieldSource;

/// A partial URL where each present field carries a set of acceptable
/// values.
///
/// Field sets are order-preserving and de-duplicated; at least one field
/// holds two or more values (the builder collapses anything smaller to a
/// [`SinglePartialUrl`]). Decomposes losslessly into single-pattern
/// combinations via [`MultiPartialUrl::combinations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPartialUrl {
    schemes: Option<Vec<String>>,
    hosts: Option<Vec<HostAddress>>,
    ports: Option<Vec<Port>>,
    context_paths: Option<Vec<Path>>,
    prefixes: Option<Vec<Path>>,
    primary: SinglePartialUrl,
}

impl MultiPartialUrl {
    /// Creates a multi pattern from de-duplicated, order-preserving value
    /// lists. Schemes must already be lower-case (the builder does both).
    pub(crate) fn new(
        schemes: Option<Vec<String>>,
        hosts: Option<Vec<HostAddress>>,
        ports: Option<Vec<Port>>,
        context_paths: Option<Vec<Path>>,
        prefixes: Option<Vec<Path>>,
    ) -> Result<Self, Error> {
        if let Some(context_paths) = &context_paths {
            for context_path in context_paths {
                validate_context_path(context_path)?;
            }
        }
        if let Some(prefixes) = &prefixes {
            for prefix in prefixes {
                validate_prefix(prefix)?;
            }
        }
        let primary = SinglePartialUrl::from_parts(
            schemes.as_ref().map(|s| s[0].clone()),
            hosts.as_ref().map(|h| h[0].clone()),
            ports.as_ref().map(|p| p[0]),
            context_paths.as_ref().map(|c| c[0].clone()),
            prefixes.as_ref().map(|p| p[0].clone()),
        );
        Ok(Self {
            schemes,
            hosts,
            ports,
            context_paths,
            prefixes,
            primary,
        })
    }

    /// The lower-case schemes, or `None` when the field source's scheme
    /// applies.
    pub fn schemes(&self) -> Option<&[String]> {
        self.schemes.as_deref()
    }

    /// The hosts, or `None` when the field source's host applies.
    pub fn hosts(&self) -> Option<&[HostAddress]> {
        self.hosts.as_deref()
    }

    /// The ports, or `None` when the field source's port applies.
    pub fn ports(&self) -> Option<&[Port]> {
        self.ports.as_deref()
    }

    /// The context paths, or `None` when the field source's context path
    /// applies.
    pub fn context_paths(&self) -> Option<&[Path]> {
        self.context_paths.as_deref()
    }

    /// The path prefixes, each ending in a separator, or `None` to match any
    /// path under the context.
    pub fn prefixes(&self) -> Option<&[Path]> {
        self.prefixes.as_deref()
    }

    /// The canonical single-pattern representative: the first value of every
    /// present field set, in insertion order.
    pub fn primary(&self) -> &SinglePartialUrl {
        &self.primary
    }

    /// Whether scheme, host, port, and context path sets are all present.
    pub fn is_complete(&self) -> bool {
        self.schemes.is_some()
            && self.hosts.is_some()
            && self.ports.is_some()
            && self.context_paths.is_some()
    }

    /// Tests each field set directly against the source instead of iterating
    /// combinations.
    ///
    /// For the prefix, scans the source path's separator positions from the
    /// longest candidate backward, so the deepest registered prefix wins.
    /// Behaviorally equivalent to scanning [`MultiPartialUrl::combinations`]
    /// in order and returning the first per-element match.
    pub fn matches(&self, source: &dyn FieldSource) -> Result<Option<SinglePartialUrl>, FieldError> {
        let mut scheme = None;
        if let Some(schemes) = &self.schemes {
            let lower = source.scheme()?.to_ascii_lowercase();
            if !schemes.contains(&lower) {
                return Ok(None);
            }
            scheme = Some(lower);
        }
        let mut host = None;
        if let Some(hosts) = &self.hosts {
            let source_host = source.host()?;
            if !hosts.contains(&source_host) {
                return Ok(None);
            }
            host = Some(source_host);
        }
        let mut port = None;
        if let Some(ports) = &self.ports {
            let source_port = source.port()?;
            if !ports.contains(&source_port) {
                return Ok(None);
            }
            port = Some(source_port);
        }
        let mut context_path = None;
        if let Some(context_paths) = &self.context_paths {
            let source_context_path = source.context_path()?;
            if !context_paths.contains(&source_context_path) {
                return Ok(None);
            }
            context_path = Some(source_context_path);
        }
        let mut prefix = None;
        if let Some(prefixes) = &self.prefixes {
            let Some(path) = source.path()? else {
                return Ok(None);
            };
            let path_str = path.as_str();
            // Longest candidate first, one separator shorter each step
            let mut last_separator = path_str.rfind(SEPARATOR);
            loop {
                let Some(pos) = last_separator else {
                    return Ok(None);
                };
                let candidate = &path_str[..=pos];
                if prefixes.iter().any(|p| p.as_str() == candidate) {
                    prefix = Some(path.prefix(pos + 1));
                    break;
                }
                last_separator = if pos == 0 {
                    None
                } else {
                    path_str[..pos].rfind(SEPARATOR)
                };
            }
        }
        let matched = SinglePartialUrl::from_parts(scheme, host, port, context_path, prefix);
        if matched == self.primary {
            return Ok(Some(self.primary.clone()));
        }
        Ok(Some(matched))
    }

    /// Materializes the full Cartesian product of the field sets.
    ///
    /// Enumeration order is host × context path × prefix × port × scheme,
    /// with the prefix dimension sorted deepest first so the order agrees
    /// with [`SinglePartialUrl`]'s specificity ordering and with
    /// [`MultiPartialUrl::matches`]. Fails fast when the product exceeds the
    /// combination limit.
    pub fn combinations(&self) -> Result<Vec<SinglePartialUrl>, Error> {
        let mut count = 1u64;
        for len in [
            len_of(&self.hosts),
            len_of(&self.context_paths),
            len_of(&self.prefixes),
            len_of(&self.ports),
            len_of(&self.schemes),
        ] {
            count = count
                .checked_mul(len as u64)
                .ok_or(Error::TooManyCombinations(u64::MAX))?;
        }
        if count > MAX_COMBINATIONS {
            return Err(Error::TooManyCombinations(count));
        }

        let sorted_prefixes = self.prefixes.as_ref().map(|prefixes| {
            let mut sorted: Vec<&Path> = prefixes.iter().collect();
            sorted.sort_by(|a, b| cmp_prefix(Some(a), Some(b)));
            sorted
        });

        let mut results = Vec::with_capacity(count as usize);
        for host in slots(&self.hosts) {
            for context_path in slots(&self.context_paths) {
                for prefix in slots_sorted(&sorted_prefixes) {
                    for port in slots(&self.ports) {
                        for scheme in slots(&self.schemes) {
                            let single = SinglePartialUrl::from_parts(
                                scheme.cloned(),
                                host.cloned(),
                                port.copied(),
                                context_path.cloned(),
                                prefix.cloned(),
                            );
                            if single == self.primary {
                                results.push(self.primary.clone());
                            } else {
                                results.push(single);
                            }
                        }
                    }
                }
            }
        }
        debug_assert_eq!(results.len() as u64, count);
        Ok(results)
    }

    /// Completes this pattern into a concrete URL.
    ///
    /// Without a source, uses the primary values. With one, each field
    /// independently prefers the source value when it is a member of that
    /// field's set, falling back to the first value — except the prefix,
    /// which always uses the first prefix. With two or more prefixes the
    /// result is therefore not guaranteed consistent with
    /// `matches(source)?.to_url(source)`; with zero or one prefix it is.
    pub fn to_url(&self, source: Option<&dyn FieldSource>) -> Result<Url, Error> {
        let scheme = match &self.schemes {
            None => required(source, "scheme")?.scheme()?,
            Some(schemes) => {
                let from_source = match source {
                    Some(source) => {
                        let lower = source.scheme()?.to_ascii_lowercase();
                        schemes.contains(&lower).then_some(lower)
                    }
                    None => None,
                };
                from_source.unwrap_or_else(|| schemes[0].clone())
            }
        };
        let port = match &self.ports {
            None => required(source, "port")?.port()?,
            Some(ports) => {
                let from_source = match source {
                    Some(source) => {
                        let source_port = source.port()?;
                        ports.contains(&source_port).then_some(source_port)
                    }
                    None => None,
                };
                from_source.unwrap_or(ports[0])
            }
        };
        let host = match &self.hosts {
            None => required(source, "host")?.host()?,
            Some(hosts) => {
                // Prefer the registered canonical form over the source's
                let canonical = match source {
                    Some(source) => {
                        let source_host = source.host()?;
                        hosts.iter().find(|host| **host == source_host).cloned()
                    }
                    None => None,
                };
                canonical.unwrap_or_else(|| hosts[0].clone())
            }
        };
        let context_path = match &self.context_paths {
            None => required(source, "contextPath")?.context_path()?,
            Some(context_paths) => {
                let from_source = match source {
                    Some(source) => {
                        let source_context_path = source.context_path()?;
                        context_paths
                            .contains(&source_context_path)
                            .then_some(source_context_path)
                    }
                    None => None,
                };
                from_source.unwrap_or_else(|| context_paths[0].clone())
            }
        };
        let file = build_file(
            &context_path,
            self.prefixes.as_ref().map(|prefixes| &prefixes[0]),
        );
        build_url(&scheme, &host, port, &file)
    }
}

fn required<'a>(
    source: Option<&'a dyn FieldSource>,
    field: &'static str,
) -> Result<&'a dyn FieldSource, Error> {
    source.ok_or(Error::MissingField(field))
}

fn len_of<T>(values: &Option<Vec<T>>) -> usize {
    values.as_ref().map_or(1, Vec::len)
}

/// One iteration slot per value, or a single wildcard slot when absent.
fn slots<T>(values: &Option<Vec<T>>) -> Vec<Option<&T>> {
    match values {
        None => vec![None],
        Some(values) => values.iter().map(Some).collect(),
    }
}

fn slots_sorted<'a>(sorted: &'a Option<Vec<&'a Path>>) -> Vec<Option<&'a Path>> {
    match sorted {
        None => vec![None],
        Some(sorted) => sorted.iter().copied().map(Some).collect(),
    }
}

fn write_set<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    values: &[T],
    mut write_one: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    if values.len() == 1 {
        return write_one(f, &values[0]);
    }
    f.write_str("{")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write_one(f, value)?;
    }
    f.write_str("}")
}

impl fmt::Display for MultiPartialUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schemes) = &self.schemes {
            write_set(f, schemes, |f, scheme| f.write_str(scheme))?;
            f.write_str(":")?;
        }
        f.write_str("//")?;
        match &self.hosts {
            None => f.write_str(WILDCARD)?,
            Some(hosts) => write_set(f, hosts, |f, host| {
                f.write_str(&host.to_bracketed_string())
            })?,
        }
        match &self.ports {
            None => write!(f, ":{WILDCARD}")?,
            Some(ports) if ports.len() == 1 => {
                // Hide the default port only when the scheme is unambiguous
                let scheme = match &self.schemes {
                    Some(schemes) if schemes.len() == 1 => Some(schemes[0].as_str()),
                    _ => None,
                };
                let hidden =
                    scheme.is_some_and(|scheme| default_port_hidden(scheme, ports[0].port()));
                if !hidden {
                    write!(f, ":{}", ports[0].port())?;
                }
            }
            Some(ports) => {
                f.write_str(":")?;
                write_set(f, ports, |f, port| write!(f, "{}", port.port()))?;
            }
        }
        match &self.context_paths {
            None => f.write_str(NULL_CONTEXT_PATH)?,
            Some(context_paths) => write_set(f, context_paths, |f, context_path| {
                if context_path.is_root() {
                    Ok(())
                } else {
                    write!(f, "{context_path}")
                }
            })?,
        }
        match &self.prefixes {
            None => f.write_str(NULL_PREFIX),
            Some(prefixes) => write_set(f, prefixes, |f, prefix| write!(f, "{prefix}")),
        }
    }
}

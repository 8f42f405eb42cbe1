//! Indexed registry of partial URL patterns.
//!
//! # Data Flow
//! ```text
//! put(pattern, value)
//!     → expand into single combinations (write lock)
//!     → insert each at host → contextPath → prefix → port → scheme
//!
//! get(field_source)
//!     → per-dimension search orders: [exact, wildcard]
//!       (prefix: deepest registered depth downward)
//!     → first leaf found (read lock)
//!     → complete URL via to_url (lock released)
//! ```
//!
//! # Design Decisions
//! - One `RwLock` over the whole nested index: readers never observe a
//!   partially updated structure, writers are exclusive.
//! - The nesting order (host, contextPath, prefix, port, scheme) with
//!   exact-before-wildcard probing makes the first leaf found the most
//!   specific match under `SinglePartialUrl`'s ordering.
//! - The field source is never invoked while a lock is held except in
//!   `verify` builds, where the sequential cross-check scans under the read
//!   lock.

pub mod matched;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[cfg(feature = "verify")]
use std::collections::BTreeMap;

use crate::error::Error;
use crate::fields::path::SEPARATOR;
use crate::fields::{HostAddress, Path, Port};
use crate::pattern::{PartialUrl, SinglePartialUrl};
use crate::source::FieldSource;

pub use matched::PartialUrlMatch;

/// A registered `(pattern, combination, value)` triple.
#[derive(Debug)]
struct Entry<V> {
    partial: Arc<PartialUrl>,
    single: SinglePartialUrl,
    value: Arc<V>,
}

#[cfg(feature = "verify")]
impl<V> Clone for Entry<V> {
    fn clone(&self) -> Self {
        Self {
            partial: Arc::clone(&self.partial),
            single: self.single.clone(),
            value: Arc::clone(&self.value),
        }
    }
}

type SchemeMap<V> = HashMap<Option<String>, Arc<Entry<V>>>;
type PortMap<V> = HashMap<Option<Port>, SchemeMap<V>>;

/// Prefix level of the index under one (host, contextPath) pair.
struct PrefixLevel<V> {
    /// Maximum separator count among prefixes registered here; bounds the
    /// lookup's backward walk.
    max_separators: usize,
    by_prefix: HashMap<String, PortMap<V>>,
    /// Entries with no prefix restriction.
    no_prefix: Option<PortMap<V>>,
}

type ContextMap<V> = HashMap<Option<Path>, PrefixLevel<V>>;
type HostMap<V> = HashMap<Option<HostAddress>, ContextMap<V>>;

struct Index<V> {
    hosts: HostMap<V>,
    /// Sorted shadow of every registered combination, for the sequential
    /// cross-check.
    #[cfg(feature = "verify")]
    sequential: BTreeMap<SinglePartialUrl, Entry<V>>,
}

impl<V> Index<V> {
    fn new() -> Self {
        Self {
            hosts: HashMap::new(),
            #[cfg(feature = "verify")]
            sequential: BTreeMap::new(),
        }
    }

    /// Nested fallback probe; returns the first leaf, which the nesting
    /// order guarantees is the most specific match.
    fn lookup<'a>(
        &'a self,
        host_order: &[Option<HostAddress>; 2],
        context_path_order: &[Option<Path>; 2],
        path_str: &str,
        port_order: &[Option<Port>; 2],
        scheme_order: &[Option<String>; 2],
    ) -> Option<&'a Arc<Entry<V>>> {
        for host in host_order {
            let Some(context_map) = self.hosts.get(host) else {
                continue;
            };
            for context_path in context_path_order {
                let Some(level) = context_map.get(context_path) else {
                    continue;
                };
                // Separator positions up to the deepest registered prefix
                let mut separators = Vec::new();
                if level.max_separators > 0 {
                    for (i, c) in path_str.char_indices() {
                        if c == SEPARATOR {
                            separators.push(i);
                            if separators.len() == level.max_separators {
                                break;
                            }
                        }
                    }
                }
                for pos in separators.iter().rev() {
                    let candidate = &path_str[..=*pos];
                    if let Some(port_map) = level.by_prefix.get(candidate) {
                        if let Some(entry) = probe_ports(port_map, port_order, scheme_order) {
                            return Some(entry);
                        }
                    }
                }
                if let Some(port_map) = &level.no_prefix {
                    if let Some(entry) = probe_ports(port_map, port_order, scheme_order) {
                        return Some(entry);
                    }
                }
            }
        }
        None
    }

    /// Linear scan in specificity order; first successful match wins.
    #[cfg(feature = "verify")]
    fn lookup_sequential(
        &self,
        source: &dyn FieldSource,
    ) -> Result<Option<&Entry<V>>, crate::error::FieldError> {
        for (single, entry) in &self.sequential {
            if single.matches(source)?.is_some() {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}

fn probe_ports<'a, V>(
    port_map: &'a PortMap<V>,
    port_order: &[Option<Port>; 2],
    scheme_order: &[Option<String>; 2],
) -> Option<&'a Arc<Entry<V>>> {
    for port in port_order {
        let Some(scheme_map) = port_map.get(port) else {
            continue;
        };
        for scheme in scheme_order {
            if let Some(entry) = scheme_map.get(scheme) {
                return Some(entry);
            }
        }
    }
    None
}

/// Maps partial URL patterns to values and answers "which pattern matches
/// this request" with the most specific match.
///
/// Any number of reader threads may call [`PartialUrlMap::get`] concurrently;
/// [`PartialUrlMap::put`] takes the write lock for its full duration. The
/// map grows monotonically; there is no removal.
pub struct PartialUrlMap<V> {
    index: RwLock<Index<V>>,
}

impl<V> PartialUrlMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            index: RwLock::new(Index::new()),
        }
    }

    /// Registers a pattern, expanded to all its combinations, with a value.
    ///
    /// Registering a combination whose exact five field keys are already
    /// taken fails with [`Error::AlreadyRegistered`]. The index is not
    /// rolled back on failure: combinations inserted before the conflict
    /// remain, so callers should treat a conflict as fatal to the whole
    /// registration batch.
    pub fn put(&self, partial: impl Into<PartialUrl>, value: V) -> Result<(), Error> {
        let partial = Arc::new(partial.into());
        let value = Arc::new(value);
        let mut index = self.index.write().expect("partial URL map lock poisoned");
        let combinations = partial.combinations()?;
        let count = combinations.len();
        for single in combinations {
            let prefix = single.prefix();
            let separators = prefix.map_or(0, Path::separator_count);
            let context_map = index.hosts.entry(single.host().cloned()).or_default();
            let level = context_map
                .entry(single.context_path().cloned())
                .or_insert_with(|| PrefixLevel {
                    max_separators: separators,
                    by_prefix: HashMap::new(),
                    no_prefix: None,
                });
            if separators > level.max_separators {
                level.max_separators = separators;
            }
            let port_map = match prefix {
                Some(prefix) => level
                    .by_prefix
                    .entry(prefix.as_str().to_owned())
                    .or_default(),
                None => level.no_prefix.get_or_insert_with(HashMap::new),
            };
            let scheme_map = port_map.entry(single.port().copied()).or_default();
            let scheme_key = single.scheme().map(str::to_owned);
            if let Some(existing) = scheme_map.get(&scheme_key) {
                return Err(Error::AlreadyRegistered {
                    partial: Box::new((*partial).clone()),
                    single: Box::new(single),
                    existing: Box::new((*existing.partial).clone()),
                });
            }
            let entry = Arc::new(Entry {
                partial: Arc::clone(&partial),
                single,
                value: Arc::clone(&value),
            });
            scheme_map.insert(scheme_key, Arc::clone(&entry));
            #[cfg(feature = "verify")]
            {
                let shadow = (*entry).clone();
                let previous = index.sequential.insert(shadow.single.clone(), shadow);
                assert!(previous.is_none(), "index and shadow disagree on conflicts");
            }
        }
        tracing::debug!(partial = %partial, combinations = count, "registered partial URL");
        Ok(())
    }

    /// Finds the most specific registered pattern matching the field source
    /// and completes its URL.
    ///
    /// Returns `Ok(None)` when nothing matches. Field-source errors
    /// propagate unchanged. URL completion runs after the read lock is
    /// released, since it calls back into the caller-provided source.
    pub fn get(&self, source: &dyn FieldSource) -> Result<Option<PartialUrlMatch<V>>, Error> {
        let host_order = [Some(source.host()?), None];
        let context_path_order = [Some(source.context_path()?), None];
        let path = source.path()?;
        let path_str = path.as_ref().map_or("", Path::as_str);
        let port_order = [Some(source.port()?), None];
        let scheme_order = [Some(source.scheme()?.to_ascii_lowercase()), None];

        let found = {
            let index = self.index.read().expect("partial URL map lock poisoned");
            let found = index.lookup(
                &host_order,
                &context_path_order,
                path_str,
                &port_order,
                &scheme_order,
            );
            #[cfg(feature = "verify")]
            {
                let sequential = index.lookup_sequential(source)?;
                let consistent = match (found, sequential) {
                    (None, None) => true,
                    (Some(indexed), Some(scanned)) => {
                        indexed.single == scanned.single
                            && indexed.partial == scanned.partial
                            && Arc::ptr_eq(&indexed.value, &scanned.value)
                    }
                    _ => false,
                };
                assert!(
                    consistent,
                    "indexed lookup inconsistent with sequential scan"
                );
            }
            found.map(Arc::clone)
        };

        let Some(entry) = found else {
            return Ok(None);
        };
        tracing::trace!(partial = %entry.partial, single = %entry.single, "matched partial URL");
        let url = entry.single.to_url(Some(source))?;
        Ok(Some(PartialUrlMatch::new(
            Arc::clone(&entry.partial),
            entry.single.clone(),
            url,
            Arc::clone(&entry.value),
        )))
    }
}

impl<V> Default for PartialUrlMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Port, Protocol};

    #[test]
    fn empty_map_matches_nothing() {
        let map: PartialUrlMap<u32> = PartialUrlMap::new();
        let source = crate::source::UrlFieldSource::new(
            url::Url::parse("http://example.com/").expect("static URL"),
        );
        assert!(map.get(&source).unwrap().is_none());
    }

    #[test]
    fn default_pattern_matches_everything() {
        let map = PartialUrlMap::new();
        map.put(SinglePartialUrl::DEFAULT, "fallback").unwrap();
        let source = crate::source::UrlFieldSource::new(
            url::Url::parse("ftp://anything.example:2121/x").expect("static URL"),
        );
        let matched = map.get(&source).unwrap().expect("default must match");
        assert_eq!(*matched.value(), "fallback");
        assert_eq!(matched.single_url(), &SinglePartialUrl::DEFAULT);
    }

    #[test]
    fn max_prefix_depth_tracked_per_context() {
        let map = PartialUrlMap::new();
        let deep = SinglePartialUrl::new(
            None,
            None,
            Some(Port::new(80, Protocol::Tcp)),
            None,
            Some("/a/b/c/".parse().unwrap()),
        )
        .unwrap();
        map.put(deep, 1).unwrap();
        let index = map.index.read().unwrap();
        let level = index.hosts[&None].get(&None).unwrap();
        assert_eq!(level.max_separators, 4);
    }
}

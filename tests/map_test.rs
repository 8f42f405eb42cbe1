//! Registry behavior: longest-match lookup, conflicts, URL completion.

mod common;

use common::{single, FixedFieldSource};
use partial_url_map::{Error, HostAddress, PartialUrl, PartialUrlMap, Port, Protocol};
use url::Url;

#[test]
fn host_pattern_wins_over_scheme_mismatch() {
    let map = PartialUrlMap::new();
    map.put(single(Some("https"), None, None, None, None), 1)
        .unwrap();
    map.put(single(None, Some("aorepo.org"), None, None, None), 2)
        .unwrap();

    let source = FixedFieldSource::new("http", "AOREPO.ORG", 80, Some("/"));
    let matched = map.get(&source).unwrap().expect("host pattern applies");
    assert_eq!(*matched.value(), 2);
    assert_eq!(*matched.url(), Url::parse("http://aorepo.org").unwrap());
    assert_eq!(
        *matched.single_url(),
        single(None, Some("aorepo.org"), None, None, None)
    );
}

#[test]
fn deepest_registered_prefix_wins() {
    let map = PartialUrlMap::new();
    map.put(single(None, None, None, None, Some("/a/")), 1).unwrap();
    map.put(single(None, None, None, None, Some("/a/b/")), 2).unwrap();
    map.put(single(None, None, None, None, Some("/")), 3).unwrap();

    let value_for = |path: &str| {
        let source = FixedFieldSource::new("http", "example.com", 80, Some(path));
        map.get(&source).unwrap().map(|m| *m.value())
    };
    assert_eq!(value_for("/a/b/c"), Some(2));
    assert_eq!(value_for("/a/x"), Some(1));
    assert_eq!(value_for("/x"), Some(3));
}

#[test]
fn prefix_needs_trailing_content_separator() {
    let map = PartialUrlMap::new();
    map.put(single(None, None, None, None, Some("/prefix/")), 5)
        .unwrap();

    let hit = FixedFieldSource::new("http", "example.com", 80, Some("/prefix/suffix"));
    let matched = map.get(&hit).unwrap().expect("prefix applies");
    assert_eq!(*matched.value(), 5);
    assert_eq!(matched.single_url().prefix().unwrap().as_str(), "/prefix/");

    let miss = FixedFieldSource::new("http", "example.com", 80, Some("/prefix"));
    assert!(map.get(&miss).unwrap().is_none());
}

#[test]
fn prefix_does_not_leak_across_segment_boundaries() {
    let map = PartialUrlMap::new();
    map.put(single(None, None, None, None, Some("/prefix/")), 1)
        .unwrap();

    let source = FixedFieldSource::new("http", "example.com", 80, Some("/prefixed/other"));
    assert!(map.get(&source).unwrap().is_none());
}

#[test]
fn exact_combination_conflict_is_rejected() {
    let map = PartialUrlMap::new();
    let pattern = single(Some("https"), Some("example.com"), None, None, None);
    map.put(pattern.clone(), 1).unwrap();
    let result = map.put(pattern, 2);
    assert!(matches!(result, Err(Error::AlreadyRegistered { .. })));
}

#[test]
fn multi_conflicts_with_overlapping_single() {
    let map = PartialUrlMap::new();
    map.put(single(Some("http"), None, None, None, None), 1)
        .unwrap();
    let multi = PartialUrl::builder()
        .schemes(["https", "http"])
        .build()
        .unwrap();
    assert!(matches!(
        map.put(multi, 2),
        Err(Error::AlreadyRegistered { .. })
    ));
}

#[test]
fn exact_fields_beat_wildcards_dimension_by_dimension() {
    let map = PartialUrlMap::new();
    map.put(single(None, Some("example.com"), None, None, None), 1)
        .unwrap();
    map.put(
        single(None, Some("example.com"), None, None, Some("/api/")),
        2,
    )
    .unwrap();
    map.put(single(None, None, None, None, None), 3).unwrap();

    let value_for = |host: &str, path: &str| {
        let source = FixedFieldSource::new("http", host, 80, Some(path));
        map.get(&source).unwrap().map(|m| *m.value())
    };
    assert_eq!(value_for("example.com", "/api/users"), Some(2));
    assert_eq!(value_for("example.com", "/home"), Some(1));
    assert_eq!(value_for("other.org", "/api/users"), Some(3));
}

#[test]
fn scheme_and_port_distinguish_entries() {
    let map = PartialUrlMap::new();
    map.put(single(Some("https"), None, Some(443), None, None), "secure")
        .unwrap();
    map.put(single(Some("http"), None, Some(80), None, None), "plain")
        .unwrap();

    let https = FixedFieldSource::new("https", "example.com", 443, Some("/"));
    assert_eq!(*map.get(&https).unwrap().unwrap().value(), "secure");
    let http = FixedFieldSource::new("http", "example.com", 80, Some("/"));
    assert_eq!(*map.get(&http).unwrap().unwrap().value(), "plain");
    let odd = FixedFieldSource::new("http", "example.com", 8080, Some("/"));
    assert!(map.get(&odd).unwrap().is_none());
}

#[test]
fn context_path_dimension_falls_back_to_wildcard() {
    let map = PartialUrlMap::new();
    map.put(single(None, None, None, Some("/ctx"), None), 1).unwrap();
    map.put(single(None, None, None, None, None), 2).unwrap();

    let in_ctx = FixedFieldSource::new("http", "example.com", 80, Some("/page")).context_path("/ctx");
    assert_eq!(*map.get(&in_ctx).unwrap().unwrap().value(), 1);
    let at_root = FixedFieldSource::new("http", "example.com", 80, Some("/page"));
    assert_eq!(*map.get(&at_root).unwrap().unwrap().value(), 2);
}

#[test]
fn multi_pattern_reports_matched_combination() {
    let map = PartialUrlMap::new();
    let multi = PartialUrl::builder()
        .schemes(["https", "http"])
        .host(HostAddress::new("example.com").unwrap())
        .build()
        .unwrap();
    map.put(multi.clone(), 7).unwrap();

    let source = FixedFieldSource::new("http", "example.com", 80, Some("/"));
    let matched = map.get(&source).unwrap().expect("combination applies");
    assert_eq!(*matched.value(), 7);
    assert_eq!(*matched.partial_url(), multi);
    assert_eq!(
        *matched.single_url(),
        single(Some("http"), Some("example.com"), None, None, None)
    );
}

#[test]
fn lookup_is_deterministic() {
    let map = PartialUrlMap::new();
    map.put(single(None, Some("example.com"), None, None, Some("/a/")), 1)
        .unwrap();
    map.put(single(None, Some("example.com"), None, None, None), 2)
        .unwrap();

    let first = {
        let source = FixedFieldSource::new("http", "example.com", 80, Some("/a/b"));
        map.get(&source).unwrap().unwrap()
    };
    for _ in 0..10 {
        let source = FixedFieldSource::new("http", "example.com", 80, Some("/a/b"));
        let again = map.get(&source).unwrap().unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn port_used_in_index_keys() {
    let map = PartialUrlMap::new();
    map.put(
        single(None, None, Some(8443), None, None),
        "alt",
    )
    .unwrap();
    let hit = FixedFieldSource::new("https", "example.com", 8443, Some("/"));
    assert_eq!(*map.get(&hit).unwrap().unwrap().value(), "alt");
    // Same number, different protocol: not the same port
    let udp_pattern = partial_url_map::SinglePartialUrl::new(
        None,
        None,
        Some(Port::new(8443, Protocol::Udp)),
        None,
        None,
    )
    .unwrap();
    let map = PartialUrlMap::new();
    map.put(udp_pattern, "udp").unwrap();
    assert!(map.get(&hit).unwrap().is_none());
}

#[test]
fn resolved_url_prefers_pattern_fields() {
    let map = PartialUrlMap::new();
    map.put(
        single(Some("https"), Some("www.example.com"), Some(443), Some("/"), None),
        1,
    )
    .unwrap();
    let source = FixedFieldSource::new("https", "www.example.com", 443, Some("/deep/page"));
    let matched = map.get(&source).unwrap().unwrap();
    assert_eq!(*matched.url(), Url::parse("https://www.example.com").unwrap());
}

#[test]
fn concurrent_readers_and_writer() {
    use std::sync::Arc;

    let map = Arc::new(PartialUrlMap::new());
    map.put(single(None, None, None, None, None), 0usize).unwrap();

    let mut handles = Vec::new();
    for reader in 0..4 {
        let map = Arc::clone(&map);
        handles.push(std::thread::spawn(move || {
            for i in 0..200 {
                let source = FixedFieldSource::new("http", "example.com", 80, Some("/a/b"));
                let matched = map.get(&source).unwrap();
                assert!(matched.is_some(), "reader {reader} iteration {i}");
            }
        }));
    }
    let writer = {
        let map = Arc::clone(&map);
        std::thread::spawn(move || {
            for i in 0..50usize {
                let host = format!("host{i}.example.com");
                map.put(single(None, Some(host.as_str()), None, None, None), i + 1)
                    .unwrap();
            }
        })
    };
    for handle in handles {
        handle.join().unwrap();
    }
    writer.join().unwrap();
}

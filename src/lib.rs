//! Matches and resolves partial URLs.
//!
//! A partial URL is a pattern over the five addressing fields of a request
//! (scheme, host, port, context path, path prefix) where any field may be
//! left unspecified and so match anything. This crate provides the pattern
//! value types, their specificity ordering, and [`PartialUrlMap`]: a
//! concurrent registry answering "which registered pattern most specifically
//! matches this request" and completing the pattern into a concrete URL.
//!
//! This is the matching engine behind virtual-host and URL-prefix routing,
//! not a general URL parser and not a traffic-serving system: callers
//! extract the request fields (via a [`FieldSource`]) and act on the value
//! returned by the lookup.
//!
//! ```
//! use partial_url_map::{HostAddress, PartialUrl, PartialUrlMap, UrlFieldSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let map = PartialUrlMap::new();
//! map.put(PartialUrl::builder().scheme("https").build()?, 1)?;
//! map.put(
//!     PartialUrl::builder().host(HostAddress::new("aorepo.org")?).build()?,
//!     2,
//! )?;
//!
//! let request = UrlFieldSource::new(url::Url::parse("http://AOREPO.ORG/")?);
//! let matched = map.get(&request)?.expect("host pattern applies");
//! assert_eq!(*matched.value(), 2);
//! assert_eq!(matched.url().as_str(), "http://aorepo.org/");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fields;
pub mod map;
pub mod pattern;
pub mod source;

pub use error::{Error, FieldError};
pub use fields::{HostAddress, Path, Port, Protocol};
pub use map::{PartialUrlMap, PartialUrlMatch};
pub use pattern::{MultiPartialUrl, PartialUrl, PartialUrlBuilder, SinglePartialUrl, HTTP, HTTPS};
pub use source::{FieldSource, UrlFieldSource};

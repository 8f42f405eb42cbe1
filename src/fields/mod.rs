//! Validated value types for the five addressing fields.
//!
//! # Design Decisions
//! - Each type canonicalizes on construction so equality and hashing never
//!   have to re-normalize (hostnames and schemes lower-cased, IPv6 brackets
//!   stripped).
//! - Ordering on these types is what drives pattern specificity, so it is
//!   part of the public contract, not an implementation detail.

pub mod host;
pub mod path;
pub mod port;

pub use host::HostAddress;
pub use path::Path;
pub use port::{Port, Protocol};

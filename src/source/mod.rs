//! Field extraction boundary.
//!
//! The engine never touches a transport object directly: a [`FieldSource`]
//! supplies the five addressing fields of one incoming request on demand,
//! and may fail with a [`FieldError`] when the underlying source cannot
//! produce a valid value. Errors propagate unchanged through matching and
//! lookup.

pub mod url;

use crate::error::FieldError;
use crate::fields::{HostAddress, Path, Port};

pub use self::url::UrlFieldSource;

/// Supplies the concrete addressing fields of one incoming request.
pub trait FieldSource {
    /// The scheme, such as `https`/`http`; any case.
    fn scheme(&self) -> Result<String, FieldError>;

    /// The IP address or hostname.
    fn host(&self) -> Result<HostAddress, FieldError>;

    /// The port.
    fn port(&self) -> Result<Port, FieldError>;

    /// The context path, ending in a separator only when root.
    fn context_path(&self) -> Result<Path, FieldError>;

    /// The path, or `None` when the source has no path.
    fn path(&self) -> Result<Option<Path>, FieldError>;
}

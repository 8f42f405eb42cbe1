//! Field extraction from a parsed [`Url`].

use url::{Host, Url};

use crate::error::FieldError;
use crate::fields::{HostAddress, Path, Port, Protocol};
use crate::source::FieldSource;

/// Obtains addressing fields from a [`Url`].
///
/// The context path is always root, and the port falls back to the scheme's
/// known default when the URL has none. Assumes TCP.
#[derive(Debug, Clone)]
pub struct UrlFieldSource {
    url: Url,
}

impl UrlFieldSource {
    /// Wraps a parsed URL.
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// The wrapped URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FieldSource for UrlFieldSource {
    fn scheme(&self) -> Result<String, FieldError> {
        Ok(self.url.scheme().to_owned())
    }

    fn host(&self) -> Result<HostAddress, FieldError> {
        match self.url.host() {
            Some(Host::Domain(domain)) => HostAddress::new(domain),
            Some(Host::Ipv4(ip)) => Ok(HostAddress::Ip(ip.into())),
            Some(Host::Ipv6(ip)) => Ok(HostAddress::Ip(ip.into())),
            None => Err(FieldError::InvalidHost(String::new())),
        }
    }

    fn port(&self) -> Result<Port, FieldError> {
        let port = self
            .url
            .port_or_known_default()
            .ok_or_else(|| FieldError::MissingPort {
                scheme: self.url.scheme().to_owned(),
            })?;
        Ok(Port::new(port, Protocol::Tcp))
    }

    fn context_path(&self) -> Result<Path, FieldError> {
        Ok(Path::root())
    }

    fn path(&self) -> Result<Option<Path>, FieldError> {
        let path = self.url.path();
        if path.is_empty() {
            return Ok(None);
        }
        Path::new(path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_from_scheme() {
        let source = UrlFieldSource::new(Url::parse("https://example.com/").unwrap());
        assert_eq!(source.port().unwrap(), Port::new(443, Protocol::Tcp));
    }

    #[test]
    fn explicit_port_wins() {
        let source = UrlFieldSource::new(Url::parse("http://example.com:8080/x").unwrap());
        assert_eq!(source.port().unwrap(), Port::new(8080, Protocol::Tcp));
        assert_eq!(source.path().unwrap().unwrap().as_str(), "/x");
    }

    #[test]
    fn ipv6_host_is_canonical() {
        let source = UrlFieldSource::new(Url::parse("http://[::1]:81/").unwrap());
        assert_eq!(source.host().unwrap(), HostAddress::new("::1").unwrap());
    }
}

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use partial_url_map::{
    FieldError, FieldSource, HostAddress, Path, Port, Protocol, SinglePartialUrl,
};

/// A field source with fixed values, standing in for a parsed request.
pub struct FixedFieldSource {
    scheme: String,
    host: HostAddress,
    port: Port,
    context_path: Path,
    path: Option<Path>,
}

impl FixedFieldSource {
    pub fn new(scheme: &str, host: &str, port: u16, path: Option<&str>) -> Self {
        Self {
            scheme: scheme.to_owned(),
            host: HostAddress::new(host).expect("test host"),
            port: Port::new(port, Protocol::Tcp),
            context_path: Path::root(),
            path: path.map(|p| p.parse().expect("test path")),
        }
    }

    pub fn context_path(mut self, context_path: &str) -> Self {
        self.context_path = context_path.parse().expect("test context path");
        self
    }
}

impl FieldSource for FixedFieldSource {
    fn scheme(&self) -> Result<String, FieldError> {
        Ok(self.scheme.clone())
    }

    fn host(&self) -> Result<HostAddress, FieldError> {
        Ok(self.host.clone())
    }

    fn port(&self) -> Result<Port, FieldError> {
        Ok(self.port)
    }

    fn context_path(&self) -> Result<Path, FieldError> {
        Ok(self.context_path.clone())
    }

    fn path(&self) -> Result<Option<Path>, FieldError> {
        Ok(self.path.clone())
    }
}

/// Builds a single pattern from optional string fields.
pub fn single(
    scheme: Option<&str>,
    host: Option<&str>,
    port: Option<u16>,
    context_path: Option<&str>,
    prefix: Option<&str>,
) -> SinglePartialUrl {
    SinglePartialUrl::new(
        scheme,
        host.map(|h| HostAddress::new(h).expect("test host")),
        port.map(|p| Port::new(p, Protocol::Tcp)),
        context_path.map(|c| c.parse().expect("test context path")),
        prefix.map(|p| p.parse().expect("test prefix")),
    )
    .expect("test pattern")
}

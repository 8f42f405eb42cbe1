//! Port values: a port number paired with a transport protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport protocol of a [`Port`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Transmission Control Protocol.
    Tcp,
    /// User Datagram Protocol.
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("tcp"),
            Self::Udp => f.write_str("udp"),
        }
    }
}

/// A `(number, protocol)` pair.
///
/// Ordering is numeric first, protocol second (field order drives the
/// derived implementation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Port {
    port: u16,
    protocol: Protocol,
}

impl Port {
    /// Creates a port.
    pub fn new(port: u16, protocol: Protocol) -> Self {
        Self { port, protocol }
    }

    /// The port number.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The transport protocol.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port, self.protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_number_then_protocol() {
        assert!(Port::new(80, Protocol::Tcp) < Port::new(443, Protocol::Tcp));
        assert!(Port::new(53, Protocol::Tcp) < Port::new(53, Protocol::Udp));
    }

    #[test]
    fn display_includes_protocol() {
        assert_eq!(Port::new(80, Protocol::Tcp).to_string(), "80/tcp");
    }
}

//! Server configuration types.

use std::sync::Arc;
use std::time::Duration;

use tokio_rustls::TlsAcceptor;

/// How a listener treats new connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// Plaintext; clients may upgrade with STARTTLS (port 143).
    #[default]
    Plain,
    /// TLS from the first byte (port 993).
    Implicit,
}

impl Security {
    /// Returns the default port for this security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Plain => 143,
            Self::Implicit => 993,
        }
    }
}

/// IMAP server configuration, shared read-only by all sessions.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address; `None` means all interfaces on the default port.
    pub addr: Option<String>,
    /// Host name announced in the greeting.
    pub hostname: String,
    /// TLS material for STARTTLS and implicit TLS.
    pub tls: Option<Arc<rustls::ServerConfig>>,
    /// Allow LOGIN over a plaintext connection.
    pub insecure_login: bool,
    /// Deadline for reading one command line.
    pub read_timeout: Option<Duration>,
    /// Deadline for sending one batch of responses.
    pub write_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: None,
            hostname: "localhost".to_string(),
            tls: None,
            insecure_login: false,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl Config {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Returns the address to bind for the given security mode.
    #[must_use]
    pub fn listen_addr(&self, security: Security) -> String {
        self.addr
            .clone()
            .unwrap_or_else(|| format!("0.0.0.0:{}", security.default_port()))
    }

    /// Returns a TLS acceptor if TLS material is configured.
    #[must_use]
    pub fn tls_acceptor(&self) -> Option<TlsAcceptor> {
        self.tls.clone().map(TlsAcceptor::from)
    }
}

/// Builder for server configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the listen address, e.g. `127.0.0.1:1143`.
    #[must_use]
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.config.addr = Some(addr.into());
        self
    }

    /// Sets the host name announced in the greeting.
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.config.hostname = hostname.into();
        self
    }

    /// Sets the TLS material.
    #[must_use]
    pub fn tls(mut self, tls: Arc<rustls::ServerConfig>) -> Self {
        self.config.tls = Some(tls);
        self
    }

    /// Allows LOGIN before the connection is secure.
    #[must_use]
    pub const fn insecure_login(mut self, allow: bool) -> Self {
        self.config.insecure_login = allow;
        self
    }

    /// Sets the read deadline.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    /// Sets the write deadline.
    #[must_use]
    pub const fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}

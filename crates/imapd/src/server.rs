//! TCP listener and connection dispatch.

use std::io;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::backend::Backend;
use crate::connection::{Config, ImapStream, Security, with_deadline};
use crate::session::Session;
use crate::{Error, Result};

/// An IMAP server: configuration plus the backend every session talks to.
#[derive(Clone)]
pub struct Server {
    config: Arc<Config>,
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Creates a server.
    #[must_use]
    pub fn new(config: Config, backend: Arc<dyn Backend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }

    /// Listens for plaintext connections (STARTTLS capable when TLS is
    /// configured) and serves them until accepting fails.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or accepting fails.
    pub async fn listen_and_serve(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr(Security::Plain)).await?;
        self.serve(listener, Security::Plain).await
    }

    /// Listens for implicit-TLS connections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] without TLS material, otherwise an error if
    /// binding or accepting fails.
    pub async fn listen_and_serve_tls(&self) -> Result<()> {
        if self.config.tls.is_none() {
            return Err(Error::Config(
                "implicit TLS requires TLS material".to_string(),
            ));
        }
        let listener = TcpListener::bind(self.config.listen_addr(Security::Implicit)).await?;
        self.serve(listener, Security::Implicit).await
    }

    /// Accepts connections from `listener`, one task per connection.
    ///
    /// Sessions already running are not affected when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for [`Security::Implicit`] without TLS
    /// material, or the first non-transient accept error.
    pub async fn serve(&self, listener: TcpListener, security: Security) -> Result<()> {
        let acceptor = match security {
            Security::Plain => None,
            Security::Implicit => Some(self.config.tls_acceptor().ok_or_else(|| {
                Error::Config("implicit TLS requires TLS material".to_string())
            })?),
        };

        if let Ok(addr) = listener.local_addr() {
            info!(%addr, ?security, "listening");
        }

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(conn) => conn,
                Err(err) if is_transient(&err) => {
                    warn!(error = %err, "failed to accept connection");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            debug!(%peer, "accepted connection");
            let server = self.clone();
            let acceptor = acceptor.clone();
            tokio::spawn(
                async move {
                    if let Err(err) = server.handle_connection(stream, acceptor).await {
                        error!(error = %err, "session ended with error");
                    }
                }
                .instrument(info_span!("session", %peer)),
            );
        }
    }

    async fn handle_connection(
        &self,
        stream: TcpStream,
        acceptor: Option<tokio_rustls::TlsAcceptor>,
    ) -> Result<()> {
        let stream = match acceptor {
            Some(acceptor) => {
                with_deadline(self.config.read_timeout, ImapStream::accept(stream, &acceptor))
                    .await??
            }
            None => ImapStream::plain(stream),
        };

        Session::new(Arc::clone(&self.config), Arc::clone(&self.backend), stream)
            .run()
            .await
    }
}

/// Accept errors caused by a single misbehaving client.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
    )
}

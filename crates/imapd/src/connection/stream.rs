//! Stream types for IMAP connections.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio_rustls::TlsAcceptor;
use tokio_rustls::server::TlsStream;

use crate::{Error, Result};

/// A client connection that can be either plaintext or TLS.
pub enum ImapStream<S> {
    /// Plaintext stream.
    Plain(S),
    /// TLS-encrypted stream (boxed to reduce enum size).
    Tls(Box<TlsStream<S>>),
}

impl<S> ImapStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a plaintext stream.
    pub const fn plain(stream: S) -> Self {
        Self::Plain(stream)
    }

    /// Wraps an established TLS stream.
    pub fn tls(stream: TlsStream<S>) -> Self {
        Self::Tls(Box::new(stream))
    }

    /// Runs the server side of a TLS handshake on a fresh connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Handshake`] if the handshake fails.
    pub async fn accept(stream: S, acceptor: &TlsAcceptor) -> Result<Self> {
        let tls = acceptor.accept(stream).await.map_err(Error::Handshake)?;
        Ok(Self::tls(tls))
    }

    /// Upgrades a plaintext stream to TLS after STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the stream is already TLS and
    /// [`Error::Handshake`] if the handshake fails.
    pub async fn upgrade_to_tls(self, acceptor: &TlsAcceptor) -> Result<Self> {
        match self {
            Self::Plain(stream) => Self::accept(stream, acceptor).await,
            Self::Tls(_) => Err(Error::InvalidState("Stream is already TLS".to_string())),
        }
    }

    /// Returns true if the stream is TLS-encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

impl<S> AsyncRead for ImapStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Tls(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl<S> AsyncWrite for ImapStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Tls(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_flush(cx),
            Self::Tls(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Tls(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};

    use super::*;

    fn acceptor() -> TlsAcceptor {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let key = rustls::pki_types::PrivatePkcs8KeyDer::from(cert.key_pair.serialize_der());
        let config = rustls::ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(vec![cert.cert.der().clone()], key.into())
            .unwrap();
        TlsAcceptor::from(Arc::new(config))
    }

    #[tokio::test]
    async fn plain_stream_passes_bytes_through() {
        let (client, server) = duplex(64);
        let mut stream = ImapStream::plain(server);
        assert!(!stream.is_tls());

        let mut client = client;
        client.write_all(b"a1 NOOP\r\n").await.unwrap();
        let mut buf = [0u8; 9];
        stream.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"a1 NOOP\r\n");
    }

    #[tokio::test]
    async fn failed_handshake_is_reported() {
        let (mut client, server) = duplex(1024);
        client.write_all(b"definitely not a client hello\r\n").await.unwrap();

        let result = ImapStream::plain(server).upgrade_to_tls(&acceptor()).await;
        assert!(matches!(result, Err(Error::Handshake(_))));
    }
}

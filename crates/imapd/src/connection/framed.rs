//! Framed I/O for IMAP protocol.
//!
//! Client commands are LF-terminated lines (CR optional). Responses are
//! collected in a write buffer and sent on [`FramedStream::flush`], so a
//! command's whole answer goes out in one write.

use std::future::Future;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{Error, Result};

/// Default buffer size for reading and writing.
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Maximum command line length to prevent memory exhaustion.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Framed connection for the server side of the IMAP protocol.
pub struct FramedStream<S> {
    reader: BufReader<S>,
    write_buffer: BytesMut,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new framed stream without deadlines.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(DEFAULT_BUFFER_SIZE, stream),
            write_buffer: BytesMut::with_capacity(DEFAULT_BUFFER_SIZE),
            read_timeout: None,
            write_timeout: None,
        }
    }

    /// Sets the deadlines applied to each line read and each flush.
    #[must_use]
    pub const fn with_timeouts(
        mut self,
        read_timeout: Option<Duration>,
        write_timeout: Option<Duration>,
    ) -> Self {
        self.read_timeout = read_timeout;
        self.write_timeout = write_timeout;
        self
    }

    /// Reads one command line, without its line terminator.
    ///
    /// Returns `Ok(None)` when the peer closed the connection before sending
    /// anything more.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] for overlong, truncated or non-UTF-8
    /// lines, [`Error::Timeout`] when the read deadline passes.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let timeout = self.read_timeout;
        let line = with_deadline(timeout, self.read_raw_line()).await??;
        let Some(mut line) = line else {
            return Ok(None);
        };

        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        String::from_utf8(line)
            .map(Some)
            .map_err(|_| Error::Protocol("command line is not valid UTF-8".to_string()))
    }

    /// Reads up to and including the next LF.
    async fn read_raw_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::new();

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                if line.is_empty() {
                    return Ok(None);
                }
                return Err(Error::Protocol(
                    "connection closed in the middle of a line".to_string(),
                ));
            }

            if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                line.extend_from_slice(&buf[..=pos]);
                self.reader.consume(pos + 1);
                if line.len() > MAX_LINE_LENGTH {
                    return Err(Error::Protocol("line too long".to_string()));
                }
                return Ok(Some(line));
            }

            let len = buf.len();
            line.extend_from_slice(buf);
            self.reader.consume(len);

            if line.len() > MAX_LINE_LENGTH {
                return Err(Error::Protocol("line too long".to_string()));
            }
        }
    }

    /// Queues response bytes; nothing is sent until [`Self::flush`].
    pub fn write(&mut self, data: &[u8]) {
        self.write_buffer.extend_from_slice(data);
    }

    /// Sends all queued response bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on write failure, [`Error::Timeout`] when the
    /// write deadline passes.
    pub async fn flush(&mut self) -> Result<()> {
        if self.write_buffer.is_empty() {
            return Ok(());
        }

        let timeout = self.write_timeout;
        let data = self.write_buffer.split();
        let stream = self.reader.get_mut();
        with_deadline(timeout, async {
            stream.write_all(&data).await?;
            stream.flush().await
        })
        .await??;
        Ok(())
    }

    /// Flushes queued bytes and shuts down the write side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] or [`Error::Timeout`] like [`Self::flush`].
    pub async fn shutdown(&mut self) -> Result<()> {
        self.flush().await?;
        let timeout = self.write_timeout;
        with_deadline(timeout, self.reader.get_mut().shutdown()).await??;
        Ok(())
    }

    /// Returns the configured read deadline.
    #[must_use]
    pub const fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// Returns the configured write deadline.
    #[must_use]
    pub const fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout
    }

    /// Consumes the framed stream and returns the inner stream.
    ///
    /// Bytes read from the peer but not yet returned as a line are dropped,
    /// as are unflushed response bytes.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

/// Runs `fut`, failing with [`Error::Timeout`] if `timeout` passes first.
///
/// # Errors
///
/// Returns [`Error::Timeout`] when the deadline expires.
pub async fn with_deadline<F: Future>(timeout: Option<Duration>, fut: F) -> Result<F::Output> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::Timeout(limit)),
        None => Ok(fut.await),
    }
}

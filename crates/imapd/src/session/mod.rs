//! Per-connection IMAP session.
//!
//! A session owns one client connection and runs its command loop. The
//! IMAP states are:
//!
//! - Not authenticated: after the greeting
//! - Authenticated: after a successful LOGIN
//! - Selected: after a successful SELECT
//!
//! crossed with a `secure` flag that becomes true after STARTTLS (or from
//! the start on an implicit-TLS listener) and never goes back.
//!
//! Command handlers live in one file per state, like the commands RFC 3501
//! lists for that state.

mod authenticated;
mod not_authenticated;
mod selected;

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, trace};

use crate::backend::{Backend, BackendError, Mailbox};
use crate::command::Command;
use crate::connection::{Config, FramedStream, ImapStream, with_deadline};
use crate::parser::CommandLine;
use crate::response::write_status_response;
use crate::types::{Capability, ResponseCode, Status};
use crate::{Error, Result};

/// What the command loop does after a command has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Read the next command.
    Continue,
    /// Run the TLS handshake, then read the next command.
    StartTls,
    /// Close the connection.
    Logout,
}

/// One client connection.
pub struct Session<S> {
    config: Arc<Config>,
    backend: Arc<dyn Backend>,
    stream: FramedStream<ImapStream<S>>,
    secure: bool,
    authenticated: bool,
    selected: Option<Box<dyn Mailbox>>,
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("secure", &self.secure)
            .field("authenticated", &self.authenticated)
            .field("selected", &self.selected.is_some())
            .finish_non_exhaustive()
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Creates a session over an accepted connection.
    ///
    /// The session starts out secure when `stream` is already TLS.
    pub fn new(config: Arc<Config>, backend: Arc<dyn Backend>, stream: ImapStream<S>) -> Self {
        let secure = stream.is_tls();
        let stream =
            FramedStream::new(stream).with_timeouts(config.read_timeout, config.write_timeout);
        Self {
            config,
            backend,
            stream,
            secure,
            authenticated: false,
            selected: None,
        }
    }

    /// Returns true once the connection is protected by TLS.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }

    /// Returns true after a successful LOGIN.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns true while a mailbox is selected.
    #[must_use]
    pub const fn has_selected_mailbox(&self) -> bool {
        self.selected.is_some()
    }

    /// Capabilities for the current connection state.
    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        let mut caps = vec![Capability::Imap4Rev1];
        if self.config.tls.is_some() && !self.secure {
            caps.push(Capability::StartTls);
        }
        if self.login_allowed() {
            caps.push(Capability::Auth("LOGIN".to_string()));
        } else {
            caps.push(Capability::LoginDisabled);
        }
        caps
    }

    fn login_allowed(&self) -> bool {
        self.secure || self.config.insecure_login
    }

    /// Sends the greeting and serves commands until the client logs out or
    /// disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection has to be dropped: transport
    /// failures, timeouts, TLS handshake failures, unframeable input or a
    /// response that cannot be encoded.
    pub async fn run(mut self) -> Result<()> {
        self.greet()?;

        loop {
            self.stream.flush().await?;

            let Some(line) = self.stream.read_line().await? else {
                debug!("client closed the connection");
                return Ok(());
            };

            match self.handle_line(&line).await? {
                Flow::Continue => {}
                Flow::StartTls => {
                    self.stream.flush().await?;
                    self = self.upgrade().await?;
                }
                Flow::Logout => {
                    self.stream.shutdown().await?;
                    debug!("client logged out");
                    return Ok(());
                }
            }
        }
    }

    fn greet(&mut self) -> Result<()> {
        let code = ResponseCode::Capability(self.capabilities());
        let text = format!("{} IMAP4rev1 server ready", self.config.hostname);
        let mut buf = Vec::new();
        write_status_response(&mut buf, None, Status::Ok, Some(&code), &text)?;
        self.stream.write(&buf);
        Ok(())
    }

    /// Parses and answers one command line.
    pub(crate) async fn handle_line(&mut self, raw: &str) -> Result<Flow> {
        let Some(line) = CommandLine::parse(raw) else {
            return Err(Error::Protocol(format!("malformed command line {raw:?}")));
        };

        if line.is("LOGIN") {
            trace!(tag = line.tag, "C: LOGIN <redacted>");
        } else {
            trace!("C: {raw}");
        }

        let tag = line.tag;
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                debug!(tag, command = line.name, %err, "rejected command");
                return self.complete(Vec::new(), tag, Status::Bad, None, &err.to_string());
            }
        };

        debug!(tag, command = command.name(), "handling command");
        self.dispatch(tag, command).await
    }

    async fn dispatch(&mut self, tag: &str, command: Command) -> Result<Flow> {
        match command {
            Command::Capability => self.capability(tag),
            Command::Noop => self.noop(tag),
            Command::Logout => self.logout(tag),
            Command::StartTls => self.starttls(tag),
            Command::Login { username, password } => self.login(tag, &username, &password).await,
            Command::Select { mailbox } => self.select(tag, &mailbox).await,
            Command::Status { mailbox, items } => self.status(tag, &mailbox, &items).await,
            Command::List { reference, pattern } => self.list(tag, &reference, &pattern).await,
            Command::Close => self.close(tag),
            Command::UidFetch { ranges, items } => self.uid_fetch(tag, &ranges, &items).await,
        }
    }

    /// Appends the tagged completion line to `buf` and queues the whole
    /// response.
    fn complete(
        &mut self,
        mut buf: Vec<u8>,
        tag: &str,
        status: Status,
        code: Option<&ResponseCode>,
        text: &str,
    ) -> Result<Flow> {
        write_status_response(&mut buf, Some(tag), status, code, text)?;
        self.stream.write(&buf);
        Ok(Flow::Continue)
    }

    /// Answers a command that failed in the backend.
    fn backend_failure(&mut self, tag: &str, err: &BackendError) -> Result<Flow> {
        match err {
            BackendError::NotFound => {
                self.complete(Vec::new(), tag, Status::No, None, "unknown mailbox")
            }
            BackendError::Internal(source) => {
                error!(tag, error = %source, "backend failure");
                self.complete(Vec::new(), tag, Status::No, None, "internal error")
            }
        }
    }

    /// Replaces the plaintext transport with a TLS one.
    ///
    /// Bytes the client pipelined after STARTTLS are still sitting in the
    /// plaintext read buffer; they are dropped with it.
    async fn upgrade(self) -> Result<Self> {
        let Some(acceptor) = self.config.tls_acceptor() else {
            return Err(Error::Config("TLS not configured".to_string()));
        };

        let Self {
            config,
            backend,
            stream,
            authenticated,
            selected,
            ..
        } = self;
        let read_timeout = stream.read_timeout();
        let write_timeout = stream.write_timeout();

        let stream =
            with_deadline(read_timeout, stream.into_inner().upgrade_to_tls(&acceptor)).await??;
        info!("TLS established");

        Ok(Self {
            config,
            backend,
            stream: FramedStream::new(stream).with_timeouts(read_timeout, write_timeout),
            secure: true,
            authenticated,
            selected,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use tokio::io::DuplexStream;

    use super::*;
    use crate::types::{MailboxInfo, MessageDataItem, MessageDataItemName, Range};

    struct Inbox;

    #[async_trait]
    impl Mailbox for Inbox {
        async fn info(&self) -> std::result::Result<MailboxInfo, BackendError> {
            Ok(MailboxInfo {
                next_uid: 2,
                uid_validity: 3,
                ..MailboxInfo::default()
            })
        }

        async fn fetch_messages_by_uid(
            &self,
            _ranges: &[Range],
            _items: &[MessageDataItemName],
        ) -> std::result::Result<BTreeMap<u32, Vec<MessageDataItem>>, BackendError> {
            Ok(BTreeMap::new())
        }
    }

    struct TestBackend;

    #[async_trait]
    impl Backend for TestBackend {
        async fn mailbox(
            &self,
            name: &str,
        ) -> std::result::Result<Box<dyn Mailbox>, BackendError> {
            match name {
                "INBOX" => Ok(Box::new(Inbox)),
                "Broken" => Err(BackendError::internal("disk on fire")),
                _ => Err(BackendError::NotFound),
            }
        }

        async fn login(
            &self,
            username: &str,
            password: &str,
        ) -> std::result::Result<bool, BackendError> {
            match username {
                "ghost" => Err(BackendError::NotFound),
                _ => Ok(username == "user" && password == "pass"),
            }
        }
    }

    fn session(config: Config) -> (Session<DuplexStream>, DuplexStream) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let session = Session::new(
            Arc::new(config),
            Arc::new(TestBackend),
            ImapStream::plain(server),
        );
        (session, client)
    }

    /// Answers one line and returns everything the session queued.
    async fn exchange(
        session: &mut Session<DuplexStream>,
        client: &mut DuplexStream,
        line: &str,
    ) -> (Flow, String) {
        use tokio::io::AsyncReadExt;

        let flow = session.handle_line(line).await.unwrap();
        session.stream.flush().await.unwrap();

        let mut buf = vec![0u8; 64 * 1024];
        let n = client.read(&mut buf).await.unwrap();
        (flow, String::from_utf8_lossy(&buf[..n]).into_owned())
    }

    fn tls_config() -> Arc<rustls::ServerConfig> {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let key = rustls::pki_types::PrivatePkcs8KeyDer::from(cert.key_pair.serialize_der());
        Arc::new(
            rustls::ServerConfig::builder()
                .with_no_client_auth()
                .with_single_cert(vec![cert.cert.der().clone()], key.into())
                .unwrap(),
        )
    }

    #[test]
    fn capabilities_follow_state() {
        let (mut session, _client) = session(Config::builder().tls(tls_config()).build());
        assert_eq!(
            session.capabilities(),
            [
                Capability::Imap4Rev1,
                Capability::StartTls,
                Capability::LoginDisabled
            ]
        );

        session.secure = true;
        assert_eq!(
            session.capabilities(),
            [Capability::Imap4Rev1, Capability::Auth("LOGIN".to_string())]
        );
    }

    #[test]
    fn insecure_login_advertises_auth() {
        let (session, _client) = session(Config::builder().insecure_login(true).build());
        assert_eq!(
            session.capabilities(),
            [Capability::Imap4Rev1, Capability::Auth("LOGIN".to_string())]
        );
    }

    #[tokio::test]
    async fn second_starttls_is_refused() {
        let (mut session, mut client) = session(Config::builder().tls(tls_config()).build());
        session.secure = true;

        let (flow, out) = exchange(&mut session, &mut client, "a1 STARTTLS").await;
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "a1 NO connection already secure\r\n");
        assert!(session.is_secure());
    }

    #[tokio::test]
    async fn starttls_without_tls_material() {
        let (mut session, mut client) = session(Config::default());

        let (flow, out) = exchange(&mut session, &mut client, "a1 STARTTLS").await;
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "a1 NO TLS not configured\r\n");
        assert!(!session.is_secure());
    }

    #[tokio::test]
    async fn starttls_requests_upgrade() {
        let (mut session, mut client) = session(Config::builder().tls(tls_config()).build());

        let (flow, out) = exchange(&mut session, &mut client, "a1 STARTTLS").await;
        assert_eq!(flow, Flow::StartTls);
        assert_eq!(out, "a1 OK Begin TLS negotiation now\r\n");
    }

    #[tokio::test]
    async fn login_refused_while_insecure() {
        let (mut session, mut client) = session(Config::default());

        let (_, out) = exchange(&mut session, &mut client, "a1 LOGIN user pass").await;
        assert_eq!(out, "a1 NO Login only supported over a secure connection\r\n");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn login_checks_credentials() {
        let (mut session, mut client) = session(Config::builder().insecure_login(true).build());

        let (_, out) = exchange(&mut session, &mut client, "a1 LOGIN user wrong").await;
        assert_eq!(out, "a1 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n");
        assert!(!session.is_authenticated());

        let (_, out) = exchange(&mut session, &mut client, "a2 LOGIN \"user\" \"pass\"").await;
        assert_eq!(out, "a2 OK User logged in\r\n");
        assert!(session.is_authenticated());

        let (_, out) = exchange(&mut session, &mut client, "a3 LOGIN user pass").await;
        assert_eq!(out, "a3 BAD Already authenticated\r\n");
    }

    #[tokio::test]
    async fn login_unknown_user_is_a_credential_failure() {
        let (mut session, mut client) = session(Config::builder().insecure_login(true).build());

        let (_, out) = exchange(&mut session, &mut client, "a1 LOGIN ghost pass").await;
        assert_eq!(out, "a1 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn select_unknown_mailbox_keeps_selection() {
        let (mut session, mut client) = session(Config::builder().insecure_login(true).build());
        session.authenticated = true;

        let (_, out) = exchange(&mut session, &mut client, "a1 SELECT INBOX").await;
        assert!(out.ends_with("a1 OK [READ-WRITE] SELECT completed\r\n"));
        assert!(session.has_selected_mailbox());

        let (_, out) = exchange(&mut session, &mut client, "a2 SELECT Nope").await;
        assert_eq!(out, "a2 NO unknown mailbox\r\n");
        assert!(session.has_selected_mailbox());

        let (_, out) = exchange(&mut session, &mut client, "a3 SELECT Broken").await;
        assert_eq!(out, "a3 NO internal error\r\n");
        assert!(session.has_selected_mailbox());
    }

    #[tokio::test]
    async fn close_is_always_accepted() {
        let (mut session, mut client) = session(Config::default());

        let (_, out) = exchange(&mut session, &mut client, "a1 CLOSE").await;
        assert_eq!(out, "a1 OK Returned to authenticated state. (Success)\r\n");

        session.authenticated = true;
        exchange(&mut session, &mut client, "a2 SELECT INBOX").await;
        exchange(&mut session, &mut client, "a3 close").await;
        assert!(!session.has_selected_mailbox());
    }

    #[tokio::test]
    async fn commands_are_gated_by_state() {
        let (mut session, mut client) = session(Config::default());

        let (_, out) = exchange(&mut session, &mut client, "a1 SELECT INBOX").await;
        assert_eq!(out, "a1 BAD Not authenticated\r\n");

        let (_, out) = exchange(&mut session, &mut client, "a2 STATUS INBOX (MESSAGES)").await;
        assert_eq!(out, "a2 BAD Not authenticated\r\n");

        session.authenticated = true;
        let (_, out) = exchange(&mut session, &mut client, "a3 UID FETCH 1:* UID").await;
        assert_eq!(out, "a3 BAD No mailbox selected\r\n");
    }

    #[tokio::test]
    async fn unknown_commands_keep_the_session() {
        let (mut session, mut client) = session(Config::default());

        let (flow, out) = exchange(&mut session, &mut client, "a1 FROB").await;
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "a1 BAD Unknown command\r\n");

        let (_, out) = exchange(&mut session, &mut client, "a2 UID").await;
        assert_eq!(out, "a2 BAD Missing command\r\n");
    }

    #[tokio::test]
    async fn short_line_is_fatal() {
        let (mut session, _client) = session(Config::default());
        assert!(matches!(
            session.handle_line("a1").await,
            Err(Error::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn logout_ends_the_loop() {
        let (mut session, mut client) = session(Config::default());

        let (flow, out) = exchange(&mut session, &mut client, "a1 LOGOUT").await;
        assert_eq!(flow, Flow::Logout);
        assert_eq!(out, "* BYE LOGOUT Requested\r\na1 OK LOGOUT completed\r\n");
    }
}

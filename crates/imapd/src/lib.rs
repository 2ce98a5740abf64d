//! # imapd
//!
//! An embeddable IMAP4rev1 (RFC 3501) server engine. The crate handles the
//! wire protocol, session state and TLS; mail storage is supplied by the
//! application through the [`Backend`] and [`Mailbox`] traits.
//!
//! ## Features
//!
//! - **Session state machine**: not authenticated → authenticated →
//!   selected, with a one-way `secure` flag
//! - **STARTTLS and implicit TLS via rustls**: no OpenSSL dependency
//! - **Commands**: CAPABILITY, NOOP, LOGOUT, STARTTLS, LOGIN, SELECT, STATUS,
//!   LIST, CLOSE and UID FETCH
//! - **Sans-I/O grammars**: range sets and FETCH data items are parsed by
//!   pure functions in [`parser`]
//! - **Deadlines**: optional per-read and per-write timeouts
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use imapd::{Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> imapd::Result<()> {
//!     let config = Config::builder()
//!         .addr("127.0.0.1:1143")
//!         .hostname("mail.example.com")
//!         .insecure_login(true)
//!         .build();
//!
//!     // `MyBackend` implements `imapd::Backend`.
//!     let server = Server::new(config, Arc::new(MyBackend::default()));
//!     server.listen_and_serve().await
//! }
//! ```
//!
//! ## Session States
//!
//! ```text
//! ┌─────────────────────┐
//! │   NotAuthenticated  │ ─── LOGIN ───→ Authenticated
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    Authenticated    │ ─── SELECT ───→ Selected
//! └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │      Selected       │ ─── CLOSE ───→ Authenticated
//! └─────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`backend`]: Storage traits implemented by the application
//! - [`command`]: Typed client commands
//! - [`connection`]: Configuration, TLS stream and framed I/O
//! - [`parser`]: Sans-I/O request grammars
//! - [`response`]: Response serialization
//! - [`types`]: Core IMAP types (flags, ranges, data items, values)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod response;
mod server;
mod session;
pub mod types;

pub use backend::{Backend, BackendError, Mailbox};
pub use command::{Command, CommandError, StatusAttribute};
pub use connection::{Config, ConfigBuilder, FramedStream, ImapStream, Security};
pub use error::{Error, Result};
pub use parser::{ParseError, parse_message_data_item_names, parse_range_set};
pub use server::Server;
pub use session::Session;
pub use types::{
    Capability, Flag, MailboxAttribute, MailboxInfo, MailboxListing, MessageDataItem,
    MessageDataItemName, Range, ResponseCode, Status, Value,
};

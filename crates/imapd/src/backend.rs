//! Mailbox storage interface.
//!
//! The server never stores mail itself. Every mailbox operation goes through
//! a [`Backend`] supplied by the embedding application.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{MailboxInfo, MailboxListing, MessageDataItem, MessageDataItemName, Range};

/// Errors reported by a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The named mailbox does not exist.
    #[error("mailbox not found")]
    NotFound,

    /// Any other failure. The cause is logged, never sent to the client.
    #[error("backend failure: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Wraps an arbitrary error as [`BackendError::Internal`].
    pub fn internal(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Internal(err.into())
    }
}

/// Mail storage shared by all sessions.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Opens a mailbox by name.
    async fn mailbox(&self, name: &str) -> Result<Box<dyn Mailbox>, BackendError>;

    /// Checks LOGIN credentials.
    async fn login(&self, username: &str, password: &str) -> Result<bool, BackendError>;

    /// Lists mailboxes matching `pattern` relative to `reference`.
    async fn list_mailboxes(
        &self,
        reference: &str,
        pattern: &str,
    ) -> Result<Vec<MailboxListing>, BackendError> {
        let _ = (reference, pattern);
        Ok(Vec::new())
    }

    /// Hierarchy delimiter reported by LIST.
    fn delimiter(&self) -> char {
        '/'
    }
}

/// An open mailbox.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Returns a fresh metadata snapshot.
    async fn info(&self) -> Result<MailboxInfo, BackendError>;

    /// Fetches messages whose UID falls in any of `ranges`.
    ///
    /// The result maps message sequence numbers to the requested items.
    async fn fetch_messages_by_uid(
        &self,
        ranges: &[Range],
        items: &[MessageDataItemName],
    ) -> Result<BTreeMap<u32, Vec<MessageDataItem>>, BackendError>;
}

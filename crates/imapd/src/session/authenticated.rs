//! Commands valid in the authenticated state.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::{Flow, Session};
use crate::Result;
use crate::command::StatusAttribute;
use crate::response::{
    write_count, write_flags, write_mailbox_listing, write_status, write_status_response,
};
use crate::types::{Flag, MailboxAttribute, MailboxInfo, MailboxListing, ResponseCode, Status};

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn require_authenticated(&mut self, tag: &str) -> Result<Option<Flow>> {
        if self.authenticated {
            return Ok(None);
        }
        self.complete(Vec::new(), tag, Status::Bad, None, "Not authenticated")
            .map(Some)
    }

    pub(super) async fn select(&mut self, tag: &str, name: &str) -> Result<Flow> {
        if let Some(flow) = self.require_authenticated(tag)? {
            return Ok(flow);
        }

        let mailbox = match self.backend.mailbox(name).await {
            Ok(mailbox) => mailbox,
            Err(err) => return self.backend_failure(tag, &err),
        };
        let info = match mailbox.info().await {
            Ok(info) => info,
            Err(err) => return self.backend_failure(tag, &err),
        };

        let mut buf = Vec::new();
        write_flags(&mut buf, &Flag::SYSTEM)?;
        let mut permanent = Flag::SYSTEM.to_vec();
        permanent.push(Flag::AnyKeyword);
        write_status_response(
            &mut buf,
            None,
            Status::Ok,
            Some(&ResponseCode::PermanentFlags(permanent)),
            "Limited",
        )?;
        write_status_response(
            &mut buf,
            None,
            Status::Ok,
            Some(&ResponseCode::UidValidity(info.uid_validity)),
            "UIDs valid",
        )?;
        write_status_response(
            &mut buf,
            None,
            Status::Ok,
            Some(&ResponseCode::UidNext(info.next_uid)),
            "Predicted next UID",
        )?;
        write_count(&mut buf, info.exists, "EXISTS");
        write_count(&mut buf, info.recent, "RECENT");

        debug!(mailbox = name, exists = info.exists, "mailbox selected");
        self.selected = Some(mailbox);
        self.complete(
            buf,
            tag,
            Status::Ok,
            Some(&ResponseCode::ReadWrite),
            "SELECT completed",
        )
    }

    pub(super) async fn status(
        &mut self,
        tag: &str,
        name: &str,
        items: &[StatusAttribute],
    ) -> Result<Flow> {
        if let Some(flow) = self.require_authenticated(tag)? {
            return Ok(flow);
        }

        let info = match self.backend.mailbox(name).await {
            Ok(mailbox) => mailbox.info().await,
            Err(err) => Err(err),
        };
        let info = match info {
            Ok(info) => info,
            Err(err) => return self.backend_failure(tag, &err),
        };

        let values: Vec<_> = items
            .iter()
            .map(|&item| (item, status_value(&info, item)))
            .collect();
        let mut buf = Vec::new();
        write_status(&mut buf, name, &values)?;
        self.complete(buf, tag, Status::Ok, None, "STATUS completed")
    }

    pub(super) async fn list(
        &mut self,
        tag: &str,
        reference: &str,
        pattern: &str,
    ) -> Result<Flow> {
        if let Some(flow) = self.require_authenticated(tag)? {
            return Ok(flow);
        }

        let listings = if pattern.is_empty() {
            // Hierarchy delimiter query.
            let mut root = MailboxListing::new("").with_attribute(MailboxAttribute::NoSelect);
            root.delimiter = Some(self.backend.delimiter());
            vec![root]
        } else {
            match self.backend.list_mailboxes(reference, pattern).await {
                Ok(listings) => listings,
                Err(err) => return self.backend_failure(tag, &err),
            }
        };

        let mut buf = Vec::new();
        for listing in &listings {
            write_mailbox_listing(&mut buf, listing)?;
        }
        self.complete(buf, tag, Status::Ok, None, "LIST completed")
    }

    /// CLOSE never fails: it clears any selection and reports success.
    pub(super) fn close(&mut self, tag: &str) -> Result<Flow> {
        self.selected = None;
        self.complete(
            Vec::new(),
            tag,
            Status::Ok,
            None,
            "Returned to authenticated state. (Success)",
        )
    }
}

const fn status_value(info: &MailboxInfo, item: StatusAttribute) -> u32 {
    match item {
        StatusAttribute::Messages => info.exists,
        StatusAttribute::Recent => info.recent,
        StatusAttribute::UidNext => info.next_uid,
        StatusAttribute::UidValidity => info.uid_validity,
        StatusAttribute::Unseen => info.unseen,
    }
}

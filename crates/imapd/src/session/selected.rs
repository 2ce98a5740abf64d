//! Commands valid in the selected state.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::{Flow, Session};
use crate::Result;
use crate::response::write_fetch;
use crate::types::{MessageDataItemName, Range, Status};

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub(super) async fn uid_fetch(
        &mut self,
        tag: &str,
        ranges: &[Range],
        items: &[MessageDataItemName],
    ) -> Result<Flow> {
        let Some(mailbox) = self.selected.as_deref() else {
            return self.complete(Vec::new(), tag, Status::Bad, None, "No mailbox selected");
        };

        let messages = match mailbox.fetch_messages_by_uid(ranges, items).await {
            Ok(messages) => messages,
            Err(err) => return self.backend_failure(tag, &err),
        };
        debug!(count = messages.len(), "fetched messages");

        let mut buf = Vec::new();
        for (seq, data) in &messages {
            write_fetch(&mut buf, *seq, data)?;
        }
        self.complete(buf, tag, Status::Ok, None, "UID FETCH completed")
    }
}

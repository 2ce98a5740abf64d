//! Commands valid in any state and in the not-authenticated state.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, warn};

use super::{Flow, Session};
use crate::Result;
use crate::backend::BackendError;
use crate::response::{write_capability, write_status_response};
use crate::types::{ResponseCode, Status};

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub(super) fn capability(&mut self, tag: &str) -> Result<Flow> {
        let mut buf = Vec::new();
        write_capability(&mut buf, &self.capabilities());
        self.complete(buf, tag, Status::Ok, None, "CAPABILITY completed")
    }

    pub(super) fn noop(&mut self, tag: &str) -> Result<Flow> {
        self.complete(Vec::new(), tag, Status::Ok, None, "NOOP completed")
    }

    pub(super) fn logout(&mut self, tag: &str) -> Result<Flow> {
        let mut buf = Vec::new();
        write_status_response(&mut buf, None, Status::Bye, None, "LOGOUT Requested")?;
        self.complete(buf, tag, Status::Ok, None, "LOGOUT completed")?;
        Ok(Flow::Logout)
    }

    /// STARTTLS answers OK and leaves the handshake to the command loop,
    /// which owns the transport.
    pub(super) fn starttls(&mut self, tag: &str) -> Result<Flow> {
        if self.secure {
            return self.complete(Vec::new(), tag, Status::No, None, "connection already secure");
        }
        if self.config.tls.is_none() {
            return self.complete(Vec::new(), tag, Status::No, None, "TLS not configured");
        }

        self.complete(Vec::new(), tag, Status::Ok, None, "Begin TLS negotiation now")?;
        Ok(Flow::StartTls)
    }

    pub(super) async fn login(
        &mut self,
        tag: &str,
        username: &str,
        password: &str,
    ) -> Result<Flow> {
        if self.authenticated {
            return self.complete(Vec::new(), tag, Status::Bad, None, "Already authenticated");
        }
        if !self.login_allowed() {
            return self.complete(
                Vec::new(),
                tag,
                Status::No,
                None,
                "Login only supported over a secure connection",
            );
        }

        match self.backend.login(username, password).await {
            Ok(true) => {
                info!(username, "user logged in");
                self.authenticated = true;
                self.complete(Vec::new(), tag, Status::Ok, None, "User logged in")
            }
            Ok(false) | Err(BackendError::NotFound) => {
                warn!(username, "login failed");
                self.complete(
                    Vec::new(),
                    tag,
                    Status::No,
                    Some(&ResponseCode::AuthenticationFailed),
                    "Invalid credentials",
                )
            }
            Err(err) => self.backend_failure(tag, &err),
        }
    }
}

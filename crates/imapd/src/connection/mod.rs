//! Connection plumbing.
//!
//! - Configuration (listen address, TLS material, deadlines)
//! - TLS/plaintext stream abstraction with STARTTLS upgrade
//! - Framed line I/O

mod config;
mod framed;
mod stream;

pub use config::{Config, ConfigBuilder, Security};
pub use framed::{FramedStream, MAX_LINE_LENGTH, with_deadline};
pub use stream::ImapStream;

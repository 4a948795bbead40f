//! Request/reply channel endpoints.
//!
//! Implements the strict reply-socket contract the bridge depends on:
//! each inbound request must receive exactly one outbound reply before
//! the next request is accepted. [`ReplyChannel`] enforces the
//! alternation on the server side; [`RequestChannel`] pairs each send
//! with a single blocking receive on the client side.

pub mod error;
pub mod reply;
pub mod request;

pub use error::{ChannelError, Result};
pub use reply::{ReplyChannel, ReplyListener};
pub use request::{Reply, ReplyKind, RequestChannel};

/// Channel-level configuration shared by both endpoints.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Maximum payload size accepted or sent, in bytes.
    pub max_payload_size: usize,
    /// Receive timeout. `None` blocks indefinitely.
    pub recv_timeout: Option<std::time::Duration>,
    /// Send timeout. `None` blocks indefinitely.
    pub send_timeout: Option<std::time::Duration>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            max_payload_size: renderbridge_wire::DEFAULT_MAX_PAYLOAD,
            recv_timeout: None,
            send_timeout: None,
        }
    }
}

//! Server-side HTML render bridge over a local request/reply socket.
//!
//! A [`Bridge`] listens on a Unix domain socket (`ipc://` address),
//! accepts one serialized application-state message at a time, renders
//! it through a [`Renderer`](render::Renderer), and replies with a
//! composed HTML document before accepting the next message.
//!
//! # Crate Structure
//!
//! - [`transport`] — Unix domain socket transport and `ipc://` addresses
//! - [`wire`] — Length-prefixed request/reply message framing
//! - [`channel`] — Strict request/reply channel endpoints
//! - [`render`] — State decoding, head metadata, document composition

/// Re-export transport types.
pub mod transport {
    pub use renderbridge_transport::*;
}

/// Re-export wire types.
pub mod wire {
    pub use renderbridge_wire::*;
}

/// Re-export channel types.
pub mod channel {
    pub use renderbridge_channel::*;
}

/// Re-export render types.
pub mod render {
    pub use renderbridge_render::*;
}

mod bridge;
mod client;

pub use bridge::{render_document, Bridge};
pub use client::{request_document, request_document_with_config, RequestError};

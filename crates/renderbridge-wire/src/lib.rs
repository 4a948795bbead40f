//! Length-prefixed message framing for the bridge's reply channel.
//!
//! Every message is framed with:
//! - A 2-byte magic number ("RB") for stream synchronization
//! - A 4-byte little-endian payload length
//! - A 1-byte message kind (request, reply, or error reply)
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_message, encode_message, Message, MessageKind, WireConfig, DEFAULT_MAX_PAYLOAD,
    HEADER_SIZE,
};
pub use error::{Result, WireError};
pub use reader::MessageReader;
pub use writer::MessageWriter;

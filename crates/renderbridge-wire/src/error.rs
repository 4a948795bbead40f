/// Errors that can occur during message encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame header contains an invalid magic number.
    #[error("invalid frame magic (expected 0x5242 \"RB\")")]
    InvalidMagic,

    /// The frame header carries a message kind this version does not know.
    #[error("unknown message kind {0:#04x}")]
    UnknownKind(u8),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing messages.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete message was received.
    #[error("connection closed (incomplete message)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;

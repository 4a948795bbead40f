use renderbridge_wire::MessageKind;

/// Errors that can occur on a request/reply channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] renderbridge_transport::TransportError),

    /// Wire-level error.
    #[error("wire error: {0}")]
    Wire(renderbridge_wire::WireError),

    /// The channel was used out of turn (e.g. a second `recv` while a
    /// reply is still owed).
    #[error("channel used out of turn: {0}")]
    OutOfTurn(&'static str),

    /// A message of the wrong kind arrived for the current state.
    #[error("unexpected {0:?} message on reply channel")]
    UnexpectedKind(MessageKind),

    /// The remote side disconnected.
    #[error("peer disconnected: {0}")]
    Disconnected(String),
}

impl From<renderbridge_wire::WireError> for ChannelError {
    fn from(err: renderbridge_wire::WireError) -> Self {
        match err {
            renderbridge_wire::WireError::ConnectionClosed => {
                ChannelError::Disconnected("connection closed".to_string())
            }
            other => ChannelError::Wire(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;

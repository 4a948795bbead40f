use renderbridge_channel::{ChannelConfig, ChannelError, ReplyKind, RequestChannel};
use renderbridge_transport::IpcAddress;

/// Errors from the one-shot client helper.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The channel failed before a reply arrived.
    #[error("request failed: {0}")]
    Channel(#[from] ChannelError),

    /// The bridge answered with an error document instead of a render.
    #[error("bridge replied with an error document")]
    ErrorReply {
        /// The error document the bridge sent.
        document: String,
    },
}

/// Send one state payload to a running bridge and return the composed
/// document.
///
/// Connects with the default 1 s timeouts. This is the whole client
/// side of the bridge: one request, one reply.
pub fn request_document(addr: &IpcAddress, state: &[u8]) -> Result<String, RequestError> {
    let channel = RequestChannel::connect(addr)?;
    exchange(channel, state)
}

/// Like [`request_document`] with explicit channel configuration.
pub fn request_document_with_config(
    addr: &IpcAddress,
    state: &[u8],
    config: ChannelConfig,
) -> Result<String, RequestError> {
    let channel = RequestChannel::connect_with_config(addr, config)?;
    exchange(channel, state)
}

fn exchange(mut channel: RequestChannel, state: &[u8]) -> Result<String, RequestError> {
    let reply = channel.request(state)?;
    match reply.kind {
        ReplyKind::Document => Ok(reply.text().into_owned()),
        ReplyKind::Error => Err(RequestError::ErrorReply {
            document: reply.text().into_owned(),
        }),
    }
}

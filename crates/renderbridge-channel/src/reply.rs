use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use renderbridge_transport::{IpcAddress, IpcListener, IpcStream};
use renderbridge_wire::{MessageKind, MessageReader, MessageWriter, WireConfig};
use tracing::debug;

use crate::error::{ChannelError, Result};
use crate::ChannelConfig;

/// Listens for request/reply sessions on the bridge socket.
pub struct ReplyListener {
    listener: IpcListener,
    config: ChannelConfig,
    next_client_id: AtomicU64,
}

impl ReplyListener {
    /// Bind to an IPC address with default channel configuration.
    pub fn bind(addr: &IpcAddress) -> Result<Self> {
        Self::bind_with_config(addr, ChannelConfig::default())
    }

    /// Bind with explicit channel configuration.
    pub fn bind_with_config(addr: &IpcAddress, config: ChannelConfig) -> Result<Self> {
        let listener = IpcListener::bind(addr)?;
        Ok(Self {
            listener,
            config,
            next_client_id: AtomicU64::new(1),
        })
    }

    /// Bind with an explicit socket permission mode.
    pub fn bind_with_mode(addr: &IpcAddress, mode: u32) -> Result<Self> {
        let listener = IpcListener::bind_with_mode(addr, mode)?;
        Ok(Self {
            listener,
            config: ChannelConfig::default(),
            next_client_id: AtomicU64::new(1),
        })
    }

    /// Accept the next session (blocking).
    pub fn accept(&self) -> Result<ReplyChannel> {
        let id = self.next_client_id.fetch_add(1, Ordering::Relaxed);
        let stream = self.listener.accept()?;
        ReplyChannel::from_stream(format!("client-{id}"), stream, &self.config)
    }

    /// The socket path this listener is bound to.
    pub fn path(&self) -> &std::path::Path {
        self.listener.path()
    }
}

/// State of the reply-side alternation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyState {
    AwaitingRequest,
    AwaitingReply,
}

/// Server side of one request/reply session.
///
/// Enforces the reply-socket contract: `recv` and `reply` must strictly
/// alternate, starting with `recv`. Calls out of turn fail without
/// touching the stream, so a misbehaving handler cannot desynchronize
/// the channel.
pub struct ReplyChannel {
    id: String,
    reader: MessageReader<IpcStream>,
    writer: MessageWriter<IpcStream>,
    state: ReplyState,
    peer_credentials: Option<(u32, u32, u32)>,
}

impl ReplyChannel {
    fn from_stream(id: String, stream: IpcStream, config: &ChannelConfig) -> Result<Self> {
        let peer_credentials = stream.peer_credentials();
        let reader_stream = stream.try_clone()?;

        let wire_config = WireConfig {
            max_payload_size: config.max_payload_size,
            read_timeout: config.recv_timeout,
            write_timeout: config.send_timeout,
        };

        let reader = MessageReader::with_config_ipc(reader_stream, wire_config.clone())?;
        let writer = MessageWriter::with_config_ipc(stream, wire_config)?;

        Ok(Self {
            id,
            reader,
            writer,
            state: ReplyState::AwaitingRequest,
            peer_credentials,
        })
    }

    /// Receive the next request payload (blocking).
    ///
    /// Only legal when no reply is owed. Non-request frames are a
    /// protocol violation and fail the call.
    pub fn recv(&mut self) -> Result<Bytes> {
        if self.state != ReplyState::AwaitingRequest {
            return Err(ChannelError::OutOfTurn(
                "recv called while a reply is owed",
            ));
        }

        let message = self.reader.read_message()?;
        if message.kind != MessageKind::Request {
            return Err(ChannelError::UnexpectedKind(message.kind));
        }

        debug!(client = %self.id, size = message.payload.len(), "request received");
        self.state = ReplyState::AwaitingReply;
        Ok(message.payload)
    }

    /// Send the reply for the request last returned by [`recv`](Self::recv).
    pub fn reply(&mut self, payload: &[u8]) -> Result<()> {
        self.send_reply(MessageKind::Reply, payload)
    }

    /// Send an error reply in place of a document.
    ///
    /// Counts as the one reply the pending request is owed; the
    /// session stays usable afterwards.
    pub fn reply_error(&mut self, payload: &[u8]) -> Result<()> {
        self.send_reply(MessageKind::Error, payload)
    }

    fn send_reply(&mut self, kind: MessageKind, payload: &[u8]) -> Result<()> {
        if self.state != ReplyState::AwaitingReply {
            return Err(ChannelError::OutOfTurn(
                "reply called with no request pending",
            ));
        }

        self.writer.send(kind, payload)?;
        debug!(client = %self.id, size = payload.len(), kind = ?kind, "reply sent");
        self.state = ReplyState::AwaitingRequest;
        Ok(())
    }

    /// Whether a request is pending a reply.
    pub fn owes_reply(&self) -> bool {
        self.state == ReplyState::AwaitingReply
    }

    /// Session identifier, `client-N`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Credentials of the connected peer, when the platform exposes them.
    pub fn peer_credentials(&self) -> Option<(u32, u32, u32)> {
        self.peer_credentials
    }
}

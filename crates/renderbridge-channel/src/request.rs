use std::time::Duration;

use bytes::Bytes;
use renderbridge_transport::{IpcAddress, IpcListener, IpcStream};
use renderbridge_wire::{MessageKind, MessageReader, MessageWriter, WireConfig};
use tracing::debug;

use crate::error::{ChannelError, Result};
use crate::ChannelConfig;

/// Default send/receive timeout for the request side.
///
/// Matches the deployed clients, which configure 1000 ms socket
/// timeouts so a wedged bridge surfaces as an error instead of a hang.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);

/// What the bridge answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// A composed HTML document.
    Document,
    /// An error document sent in place of a render.
    Error,
}

/// A single reply received for a request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub kind: ReplyKind,
    pub payload: Bytes,
}

impl Reply {
    /// The payload as UTF-8 text (documents are always text).
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.payload.as_ref())
    }
}

/// Client side of the request/reply channel.
///
/// Each [`request`](Self::request) sends exactly one frame and blocks
/// for exactly one reply, so requests and replies pair one-to-one in
/// order.
pub struct RequestChannel {
    reader: MessageReader<IpcStream>,
    writer: MessageWriter<IpcStream>,
}

impl RequestChannel {
    /// Connect with default configuration (1 s timeouts).
    pub fn connect(addr: &IpcAddress) -> Result<Self> {
        let config = ChannelConfig {
            recv_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            send_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            ..ChannelConfig::default()
        };
        Self::connect_with_config(addr, config)
    }

    /// Connect with explicit configuration.
    pub fn connect_with_config(addr: &IpcAddress, config: ChannelConfig) -> Result<Self> {
        let stream = IpcListener::connect(addr)?;
        let reader_stream = stream.try_clone()?;

        let wire_config = WireConfig {
            max_payload_size: config.max_payload_size,
            read_timeout: config.recv_timeout,
            write_timeout: config.send_timeout,
        };

        let reader = MessageReader::with_config_ipc(reader_stream, wire_config.clone())?;
        let writer = MessageWriter::with_config_ipc(stream, wire_config)?;

        debug!(%addr, "request channel connected");
        Ok(Self { reader, writer })
    }

    /// Send a state payload and block for the single reply.
    pub fn request(&mut self, payload: &[u8]) -> Result<Reply> {
        self.writer.send(MessageKind::Request, payload)?;

        let message = self.reader.read_message()?;
        let kind = match message.kind {
            MessageKind::Reply => ReplyKind::Document,
            MessageKind::Error => ReplyKind::Error,
            MessageKind::Request => {
                return Err(ChannelError::UnexpectedKind(MessageKind::Request))
            }
        };

        Ok(Reply {
            kind,
            payload: message.payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::thread;

    use super::*;
    use crate::reply::ReplyListener;

    fn make_addr(tag: &str) -> (PathBuf, IpcAddress) {
        let dir = PathBuf::from(format!(
            "/tmp/rbreq-{}-{}-{}",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        let addr = IpcAddress::from(dir.join("req.sock").as_path());
        (dir, addr)
    }

    #[test]
    fn request_pairs_with_document_reply() {
        let (dir, addr) = make_addr("doc");
        let listener = ReplyListener::bind(&addr).expect("listener should bind");

        let server = thread::spawn(move || {
            let mut channel = listener.accept().expect("listener should accept");
            let request = channel.recv().expect("request should arrive");
            assert_eq!(request.as_ref(), b"{\"page\":1}");
            channel.reply(b"<html>1</html>").expect("reply should send");
        });

        let mut client = RequestChannel::connect(&addr).expect("client should connect");
        let reply = client.request(b"{\"page\":1}").expect("reply expected");

        assert_eq!(reply.kind, ReplyKind::Document);
        assert_eq!(reply.text(), "<html>1</html>");

        server.join().expect("server thread should finish");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn error_reply_is_distinguished() {
        let (dir, addr) = make_addr("err");
        let listener = ReplyListener::bind(&addr).expect("listener should bind");

        let server = thread::spawn(move || {
            let mut channel = listener.accept().expect("listener should accept");
            let _request = channel.recv().expect("request should arrive");
            channel
                .reply_error(b"<html>error</html>")
                .expect("error reply should send");
        });

        let mut client = RequestChannel::connect(&addr).expect("client should connect");
        let reply = client.request(b"not json").expect("reply expected");

        assert_eq!(reply.kind, ReplyKind::Error);

        server.join().expect("server thread should finish");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn sequential_requests_reply_in_order() {
        let (dir, addr) = make_addr("order");
        let listener = ReplyListener::bind(&addr).expect("listener should bind");

        let server = thread::spawn(move || {
            let mut channel = listener.accept().expect("listener should accept");
            for _ in 0..3 {
                let request = channel.recv().expect("request should arrive");
                let mut echo = b"seen:".to_vec();
                echo.extend_from_slice(request.as_ref());
                channel.reply(&echo).expect("reply should send");
            }
        });

        let mut client = RequestChannel::connect(&addr).expect("client should connect");
        for i in 0..3 {
            let payload = format!("S{i}");
            let reply = client.request(payload.as_bytes()).expect("reply expected");
            assert_eq!(reply.text(), format!("seen:S{i}"));
        }

        server.join().expect("server thread should finish");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn recv_timeout_surfaces_as_io_error() {
        let (dir, addr) = make_addr("timeout");
        let listener = ReplyListener::bind(&addr).expect("listener should bind");

        let server = thread::spawn(move || {
            // Accept, read the request, and never reply.
            let mut channel = listener.accept().expect("listener should accept");
            let _request = channel.recv().expect("request should arrive");
            thread::sleep(Duration::from_millis(300));
        });

        let config = ChannelConfig {
            recv_timeout: Some(Duration::from_millis(50)),
            send_timeout: Some(Duration::from_millis(50)),
            ..ChannelConfig::default()
        };
        let mut client =
            RequestChannel::connect_with_config(&addr, config).expect("client should connect");
        let err = client.request(b"{}").unwrap_err();
        assert!(matches!(err, ChannelError::Wire(_)));

        server.join().expect("server thread should finish");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn send_timeout_surfaces_as_io_error() {
        let (dir, addr) = make_addr("sendstall");
        let listener = ReplyListener::bind(&addr).expect("listener should bind");

        let server = thread::spawn(move || {
            // Accept and never read, so the client's send stalls once
            // the socket buffer fills.
            let _channel = listener.accept().expect("listener should accept");
            thread::sleep(Duration::from_millis(500));
        });

        let config = ChannelConfig {
            recv_timeout: Some(Duration::from_millis(50)),
            send_timeout: Some(Duration::from_millis(50)),
            ..ChannelConfig::default()
        };
        let mut client =
            RequestChannel::connect_with_config(&addr, config).expect("client should connect");

        // Larger than any socket buffer, so the write cannot complete.
        let payload = vec![b'x'; 8 * 1024 * 1024];
        let err = client.request(&payload).unwrap_err();
        assert!(matches!(err, ChannelError::Wire(_)));

        server.join().expect("server thread should finish");
        let _ = std::fs::remove_dir_all(&dir);
    }
}

use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use renderbridge_transport::IpcStream;

use crate::codec::{encode_message, Message, MessageKind, WireConfig};
use crate::error::{Result, WireError};
use crate::reader::transport_to_wire_error;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete messages to any `Write` stream.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new message writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new message writer with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write a complete message (blocking).
    pub fn write_message(&mut self, message: &Message) -> Result<()> {
        self.send(message.kind, message.payload.as_ref())
    }

    /// Encode and send a payload with the given kind.
    pub fn send(&mut self, kind: MessageKind, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload_size {
            return Err(WireError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_message(kind, payload, &mut self.buf)?;

        // A write timeout expires as WouldBlock; it must surface as an
        // error, not a retry.
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(WireError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current writer configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }
}

impl MessageWriter<IpcStream> {
    /// Create a message writer for `IpcStream` and apply the write
    /// timeout from config.
    pub fn with_config_ipc(inner: IpcStream, config: WireConfig) -> Result<Self> {
        inner
            .set_write_timeout(config.write_timeout)
            .map_err(transport_to_wire_error)?;
        Ok(Self::with_config(inner, config))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::decode_message;

    #[test]
    fn write_single_message() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut writer = MessageWriter::new(cursor);

        writer.send(MessageKind::Reply, b"<html></html>").unwrap();

        let inner = writer.into_inner();
        let mut wire = BytesMut::from(inner.into_inner().as_slice());
        let msg = decode_message(&mut wire, usize::MAX).unwrap().unwrap();
        assert_eq!(msg.kind, MessageKind::Reply);
        assert_eq!(msg.payload.as_ref(), b"<html></html>");
    }

    #[test]
    fn payload_too_large_rejected() {
        let cfg = WireConfig {
            max_payload_size: 4,
            ..WireConfig::default()
        };
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut writer = MessageWriter::with_config(cursor, cfg);

        let err = writer.send(MessageKind::Request, b"oversized").unwrap_err();
        assert!(matches!(err, WireError::PayloadTooLarge { .. }));
    }

    #[test]
    fn write_message_method() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut writer = MessageWriter::new(cursor);
        let message = Message::new(MessageKind::Error, "oops");

        writer.write_message(&message).unwrap();

        let inner = writer.into_inner();
        let mut wire = BytesMut::from(inner.into_inner().as_slice());
        let decoded = decode_message(&mut wire, usize::MAX).unwrap().unwrap();

        assert_eq!(decoded.kind, MessageKind::Error);
        assert_eq!(decoded.payload.as_ref(), b"oops");
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let writer_impl = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        let mut writer = MessageWriter::new(writer_impl);
        writer.send(MessageKind::Request, b"retry").unwrap();

        let inner = writer.into_inner();
        assert!(!inner.data.is_empty());
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = MessageWriter::new(ZeroWriter);
        let err = writer.send(MessageKind::Request, b"x").unwrap_err();
        assert!(matches!(err, WireError::ConnectionClosed));
    }

    #[test]
    fn expired_write_timeout_fails_the_send() {
        // An expired SO_SNDTIMEO shows up as WouldBlock.
        let mut writer = MessageWriter::new(WouldBlockWriter);
        let err = writer.send(MessageKind::Request, b"{}").unwrap_err();
        assert!(matches!(
            err,
            WireError::Io(ref io) if io.kind() == ErrorKind::WouldBlock
        ));
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct WouldBlockWriter;

    impl Write for WouldBlockWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}

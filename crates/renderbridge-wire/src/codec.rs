use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};

/// Message header: magic (2) + length (4) + kind (1) = 7 bytes.
pub const HEADER_SIZE: usize = 7;

/// Magic bytes: "RB" (0x52 0x42).
pub const MAGIC: [u8; 2] = [0x52, 0x42];

/// Default maximum payload size: 16 MiB.
///
/// Serialized application state can be large; 16 MiB comfortably
/// covers real-world state payloads while bounding memory per message.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// The role of a message on the reply channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    /// Serialized application state, client to bridge.
    Request = 1,
    /// Composed HTML document, bridge to client.
    Reply = 2,
    /// Error document sent in place of a reply.
    Error = 3,
}

impl MessageKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(MessageKind::Request),
            2 => Ok(MessageKind::Reply),
            3 => Ok(MessageKind::Error),
            other => Err(WireError::UnknownKind(other)),
        }
    }
}

/// A framed message on the reply channel.
#[derive(Debug, Clone)]
pub struct Message {
    /// What this message is: request, reply, or error reply.
    pub kind: MessageKind,
    /// The message payload.
    pub payload: Bytes,
}

impl Message {
    /// Create a new message.
    pub fn new(kind: MessageKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// The total wire size of this message (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a message into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬───────────┬──────────┬─────────────────┐
/// │ Magic (2B)   │ Length    │ Kind     │ Payload          │
/// │ 0x52 0x42    │ (4B LE)   │ (1B)     │ (Length bytes)   │
/// │ "RB"         │           │          │                  │
/// └──────────────┴───────────┴──────────┴─────────────────┘
/// ```
pub fn encode_message(kind: MessageKind, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(WireError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u32_le(payload.len() as u32);
    dst.put_u8(kind.as_u8());
    dst.put_slice(payload);
    Ok(())
}

/// Decode a message from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete message
/// yet. On success, consumes the message bytes from the buffer.
pub fn decode_message(src: &mut BytesMut, max_payload: usize) -> Result<Option<Message>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    if src[0..2] != MAGIC {
        return Err(WireError::InvalidMagic);
    }

    let payload_len = u32::from_le_bytes(src[2..6].try_into().unwrap()) as usize;
    let kind = MessageKind::try_from(src[6])?;

    if payload_len > max_payload {
        return Err(WireError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Message { kind, payload }))
}

/// Configuration for the wire codec.
#[derive(Debug, Clone)]
pub struct WireConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        let payload = br#"{"title":"Home"}"#;

        encode_message(MessageKind::Request, payload, &mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE + payload.len());

        let msg = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();

        assert_eq!(msg.kind, MessageKind::Request);
        assert_eq!(msg.payload.as_ref(), payload);
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x52, 0x42, 0x00][..]);
        let result = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_message(MessageKind::Reply, b"<html>", &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 2); // Truncate payload

        let result = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn decode_invalid_magic() {
        let mut buf = BytesMut::from(&[0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x01][..]);
        let result = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(result, Err(WireError::InvalidMagic)));
    }

    #[test]
    fn decode_unknown_kind() {
        let mut buf = BytesMut::new();
        buf.put_slice(&MAGIC);
        buf.put_u32_le(0);
        buf.put_u8(0x7F);

        let result = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(result, Err(WireError::UnknownKind(0x7F))));
    }

    #[test]
    fn decode_payload_too_large() {
        let mut buf = BytesMut::new();
        buf.put_slice(&MAGIC);
        buf.put_u32_le(1024 * 1024 * 32); // 32 MiB
        buf.put_u8(MessageKind::Request.as_u8());

        let result = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(result, Err(WireError::PayloadTooLarge { .. })));
    }

    #[test]
    fn decode_sequence_of_messages() {
        let mut buf = BytesMut::new();
        encode_message(MessageKind::Request, b"first", &mut buf).unwrap();
        encode_message(MessageKind::Reply, b"second", &mut buf).unwrap();

        let m1 = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();
        assert_eq!(m1.kind, MessageKind::Request);
        assert_eq!(m1.payload.as_ref(), b"first");

        let m2 = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();
        assert_eq!(m2.kind, MessageKind::Reply);
        assert_eq!(m2.payload.as_ref(), b"second");

        assert!(buf.is_empty());
    }

    #[test]
    fn empty_payload() {
        let mut buf = BytesMut::new();
        encode_message(MessageKind::Error, b"", &mut buf).unwrap();

        let msg = decode_message(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();
        assert_eq!(msg.kind, MessageKind::Error);
        assert!(msg.payload.is_empty());
    }

    #[test]
    fn message_wire_size() {
        let msg = Message::new(MessageKind::Reply, Bytes::from_static(b"test"));
        assert_eq!(msg.wire_size(), HEADER_SIZE + 4);
    }

    #[test]
    fn kind_byte_roundtrip() {
        for kind in [MessageKind::Request, MessageKind::Reply, MessageKind::Error] {
            assert_eq!(MessageKind::try_from(kind.as_u8()).unwrap(), kind);
        }
        assert!(matches!(
            MessageKind::try_from(0),
            Err(WireError::UnknownKind(0))
        ));
    }
}

use std::fmt;
use std::io;

use renderbridge::channel::ChannelError;
use renderbridge::render::RenderError;
use renderbridge::transport::TransportError;
use renderbridge::wire::WireError;
use renderbridge::RequestError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::InvalidAddress { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        TransportError::Bind { source, .. }
        | TransportError::Connect { source, .. }
        | TransportError::Accept(source)
        | TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn wire_error(context: &str, err: WireError) -> CliError {
    match err {
        WireError::Io(source) => io_error(context, source),
        WireError::PayloadTooLarge { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        WireError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    match err {
        ChannelError::Transport(err) => transport_error(context, err),
        ChannelError::Wire(err) => wire_error(context, err),
        ChannelError::Disconnected(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn render_error(context: &str, err: RenderError) -> CliError {
    match err {
        RenderError::Decode(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        RenderError::Template(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        RenderError::App(_) => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn request_error(context: &str, err: RequestError) -> CliError {
    match err {
        RequestError::Channel(err) => channel_error(context, err),
        RequestError::ErrorReply { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_address_maps_to_usage() {
        let err = transport_error(
            "bind failed",
            TransportError::InvalidAddress {
                addr: "tcp://nope".to_string(),
            },
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn timeout_io_maps_to_timeout_code() {
        let err = io_error("recv", io::Error::from(io::ErrorKind::WouldBlock));
        assert_eq!(err.code, TIMEOUT);
    }

    #[test]
    fn decode_failure_maps_to_data_invalid() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = render_error("render", RenderError::Decode(json_err));
        assert_eq!(err.code, DATA_INVALID);
    }
}

//! Local IPC transport for the render bridge.
//!
//! The bridge speaks over filesystem-backed Unix domain sockets,
//! addressed either as a bare path or as a ZeroMQ-style `ipc://` URI
//! (`ipc:///tmp/myapp`). This is the lowest layer; everything else
//! builds on the [`IpcStream`] type provided here.

pub mod address;
pub mod error;
pub mod stream;
pub mod uds;

pub use address::IpcAddress;
pub use error::{Result, TransportError};
pub use stream::IpcStream;
pub use uds::IpcListener;

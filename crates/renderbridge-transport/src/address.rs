use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::TransportError;

/// A local IPC endpoint address.
///
/// Accepts the ZeroMQ-style form the original deployments used
/// (`ipc:///tmp/myapp`) as well as a bare filesystem path. Both
/// resolve to a Unix domain socket path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpcAddress {
    path: PathBuf,
}

impl IpcAddress {
    /// Parse an address from `ipc://<path>` or a bare path.
    pub fn parse(addr: &str) -> Result<Self, TransportError> {
        let addr = addr.trim();
        if addr.is_empty() {
            return Err(TransportError::InvalidAddress {
                addr: addr.to_string(),
            });
        }

        let path = match addr.split_once("://") {
            Some(("ipc", rest)) if !rest.is_empty() => rest,
            Some(_) => {
                return Err(TransportError::InvalidAddress {
                    addr: addr.to_string(),
                })
            }
            None => addr,
        };

        Ok(Self {
            path: PathBuf::from(path),
        })
    }

    /// The socket path this address resolves to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FromStr for IpcAddress {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IpcAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ipc://{}", self.path.display())
    }
}

impl From<PathBuf> for IpcAddress {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}

impl From<&Path> for IpcAddress {
    fn from(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

use std::path::PathBuf;

use msgslot_wire::{ErrorCode, WireError};

/// Errors that can occur hosting or addressing a served slot.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Failed to bind the socket path.
    #[error("failed to bind to {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to connect to the socket path.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// An I/O error occurred on the connection.
    #[error("host I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A framing error occurred on the connection.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// The peer sent a frame the protocol does not allow at this point.
    #[error("protocol violation: {0}")]
    Protocol(&'static str),

    /// The served slot rejected the operation; `code` is the store's
    /// stable failure code.
    #[error("slot error ({code:?}): {detail}")]
    Remote { code: ErrorCode, detail: String },
}

pub type Result<T> = std::result::Result<T, HostError>;

use std::path::PathBuf;

/// Errors that can occur while exchanging a command with the MC.
///
/// A transport error means the response buffer is undefined. Firmware
/// refusals are not transport errors; they come back as a status in a
/// well-formed response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the MC device.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to connect to a mailbox bridge.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred while exchanging a command.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer returned fewer bytes than a full command buffer.
    #[error("short transfer ({actual} of {expected} bytes)")]
    ShortTransfer { expected: usize, actual: usize },

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// The channel can no longer be used.
    #[error("channel unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

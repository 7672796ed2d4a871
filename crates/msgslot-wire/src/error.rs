/// Errors that can occur while framing or parsing protocol operations.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame header contains an invalid magic number.
    #[error("invalid frame magic (expected 0x4D53 \"MS\")")]
    InvalidMagic,

    /// The frame header names an opcode this protocol does not define.
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    /// The frame payload exceeds the protocol maximum.
    #[error("frame payload too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The frame body does not match its opcode's layout.
    #[error("malformed {op} frame")]
    Malformed { op: &'static str },

    /// An I/O error occurred while reading or writing frames.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;

/// Errors that can occur during slot operations.
///
/// Every failure mode maps to exactly one variant; nothing is retried
/// internally.
#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    /// A session precondition was violated: no channel selected, channel
    /// id 0, or a zero-length write.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The write payload exceeds the maximum message length.
    #[error("message too large ({len} bytes, max {max})")]
    MessageTooLarge { len: usize, max: usize },

    /// The addressed channel has never been written.
    #[error("no message on channel")]
    NoMessage,

    /// The reader-supplied capacity is smaller than the stored message.
    #[error("insufficient space ({capacity} bytes, message is {len})")]
    InsufficientSpace { capacity: usize, len: usize },

    /// The byte transfer to or from the caller could not complete.
    ///
    /// During a write this is raised before the channel is touched; during
    /// a read the stored message is unaffected.
    #[error("transfer fault: {0}")]
    TransferFault(#[from] std::io::Error),

    /// Allocation of an instance, channel, or session entry failed.
    #[error("out of memory")]
    OutOfMemory,
}

pub type Result<T> = std::result::Result<T, SlotError>;

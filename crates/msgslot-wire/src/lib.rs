//! Operation framing for the message-slot host protocol.
//!
//! Every protocol exchange is one framed operation:
//! - A 2-byte magic number ("MS") for stream synchronization
//! - A 1-byte opcode
//! - A 2-byte little-endian payload length
//!
//! Requests (`Open`, `Select`, `Write`, `Read`) flow client to host;
//! replies (`Ok`, `Err`) flow back. Close has no frame; it is connection
//! teardown. `Err` frames carry the stable per-failure-mode code from
//! [`ErrorCode`], so a remote slot error survives the wire as the same
//! distinct code the core raised.

pub mod codec;
pub mod error;
pub mod op;
pub mod reader;
pub mod writer;

pub use codec::{decode_op, encode_op, HEADER_SIZE, MAGIC, MAX_FRAME_PAYLOAD};
pub use error::{Result, WireError};
pub use op::{ErrorCode, Op, OpCode};
pub use reader::OpReader;
pub use writer::OpWriter;

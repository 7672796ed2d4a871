use bytes::Bytes;
use msgslot_core::SlotError;

/// Wire opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Bind the connection to a device instance (request, once).
    Open = 1,
    /// Select the session's channel (request).
    Select = 2,
    /// Store one whole message on the selected channel (request).
    Write = 3,
    /// Retrieve the stored message (request).
    Read = 4,
    /// Success reply; payload meaning depends on the request.
    Ok = 5,
    /// Failure reply: stable error code plus human-readable detail.
    Err = 6,
}

impl OpCode {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Open),
            2 => Some(Self::Select),
            3 => Some(Self::Write),
            4 => Some(Self::Read),
            5 => Some(Self::Ok),
            6 => Some(Self::Err),
            _ => None,
        }
    }
}

/// Stable error codes carried by `Err` frames, one per slot failure mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    InvalidArgument = 1,
    MessageTooLarge = 2,
    NoMessage = 3,
    InsufficientSpace = 4,
    TransferFault = 5,
    OutOfMemory = 6,
}

impl ErrorCode {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::InvalidArgument),
            2 => Some(Self::MessageTooLarge),
            3 => Some(Self::NoMessage),
            4 => Some(Self::InsufficientSpace),
            5 => Some(Self::TransferFault),
            6 => Some(Self::OutOfMemory),
            _ => None,
        }
    }
}

impl From<&SlotError> for ErrorCode {
    fn from(err: &SlotError) -> Self {
        match err {
            SlotError::InvalidArgument(_) => Self::InvalidArgument,
            SlotError::MessageTooLarge { .. } => Self::MessageTooLarge,
            SlotError::NoMessage => Self::NoMessage,
            SlotError::InsufficientSpace { .. } => Self::InsufficientSpace,
            SlotError::TransferFault(_) => Self::TransferFault,
            SlotError::OutOfMemory => Self::OutOfMemory,
        }
    }
}

/// One decoded protocol operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Open { instance: u8 },
    Select { channel: u32 },
    Write { payload: Bytes },
    Read { capacity: u32 },
    Ok { payload: Bytes },
    Err { code: ErrorCode, detail: String },
}

impl Op {
    /// The opcode this operation frames as.
    pub fn code(&self) -> OpCode {
        match self {
            Op::Open { .. } => OpCode::Open,
            Op::Select { .. } => OpCode::Select,
            Op::Write { .. } => OpCode::Write,
            Op::Read { .. } => OpCode::Read,
            Op::Ok { .. } => OpCode::Ok,
            Op::Err { .. } => OpCode::Err,
        }
    }

    /// An empty success reply.
    pub fn ok() -> Self {
        Op::Ok {
            payload: Bytes::new(),
        }
    }

    /// The failure reply for a slot error, carrying its stable code.
    pub fn err(err: &SlotError) -> Self {
        Op::Err {
            code: ErrorCode::from(err),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_roundtrip() {
        for raw in 1..=6u8 {
            let code = OpCode::from_u8(raw).unwrap();
            assert_eq!(code as u8, raw);
        }
        assert!(OpCode::from_u8(0).is_none());
        assert!(OpCode::from_u8(7).is_none());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ErrorCode::from(&SlotError::NoMessage) as u8, 3);
        assert_eq!(
            ErrorCode::from(&SlotError::MessageTooLarge { len: 129, max: 128 }) as u8,
            2
        );
        assert_eq!(ErrorCode::from_u8(4), Some(ErrorCode::InsufficientSpace));
        assert!(ErrorCode::from_u8(0).is_none());
        assert!(ErrorCode::from_u8(7).is_none());
    }

    #[test]
    fn err_op_carries_code_and_detail() {
        let op = Op::err(&SlotError::InvalidArgument("channel not configured"));
        match op {
            Op::Err { code, detail } => {
                assert_eq!(code, ErrorCode::InvalidArgument);
                assert!(detail.contains("channel not configured"));
            }
            other => panic!("expected Err op, got {other:?}"),
        }
    }
}

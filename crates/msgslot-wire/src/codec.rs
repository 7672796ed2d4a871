use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};
use crate::op::{ErrorCode, Op, OpCode};

/// Frame header: magic (2) + opcode (1) + length (2) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Magic bytes: "MS" (0x4D 0x53).
pub const MAGIC: [u8; 2] = [0x4D, 0x53];

/// Maximum frame payload.
///
/// Well above the 128-byte message cap, so an oversized write still
/// reaches the store and fails with the store's own taxonomy rather than
/// at the framing layer.
pub const MAX_FRAME_PAYLOAD: usize = 4096;

/// Encode an operation into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────┬───────────┬──────────────────┐
/// │ Magic (2B)   │ Opcode     │ Length    │ Payload          │
/// │ 0x4D 0x53    │ (1B)       │ (2B LE)   │ (Length bytes)   │
/// │ "MS"         │            │           │                  │
/// └──────────────┴────────────┴───────────┴──────────────────┘
/// ```
pub fn encode_op(op: &Op, dst: &mut BytesMut) -> Result<()> {
    let body = encode_body(op);
    if body.len() > MAX_FRAME_PAYLOAD {
        return Err(WireError::FrameTooLarge {
            size: body.len(),
            max: MAX_FRAME_PAYLOAD,
        });
    }

    dst.reserve(HEADER_SIZE + body.len());
    dst.put_slice(&MAGIC);
    dst.put_u8(op.code() as u8);
    dst.put_u16_le(body.len() as u16);
    dst.put_slice(&body);
    Ok(())
}

fn encode_body(op: &Op) -> Bytes {
    match op {
        Op::Open { instance } => Bytes::copy_from_slice(&[*instance]),
        Op::Select { channel } => Bytes::copy_from_slice(&channel.to_le_bytes()),
        Op::Write { payload } => payload.clone(),
        Op::Read { capacity } => Bytes::copy_from_slice(&capacity.to_le_bytes()),
        Op::Ok { payload } => payload.clone(),
        Op::Err { code, detail } => {
            let mut body = BytesMut::with_capacity(1 + detail.len());
            body.put_u8(*code as u8);
            body.put_slice(detail.as_bytes());
            body.freeze()
        }
    }
}

/// Decode one operation from a buffer.
///
/// Returns `Ok(None)` if the buffer does not contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_op(src: &mut BytesMut) -> Result<Option<Op>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    if src[0..2] != MAGIC {
        return Err(WireError::InvalidMagic);
    }

    let raw_code = src[2];
    let code = OpCode::from_u8(raw_code).ok_or(WireError::UnknownOpcode(raw_code))?;
    let body_len = u16::from_le_bytes([src[3], src[4]]) as usize;

    if body_len > MAX_FRAME_PAYLOAD {
        return Err(WireError::FrameTooLarge {
            size: body_len,
            max: MAX_FRAME_PAYLOAD,
        });
    }

    if src.len() < HEADER_SIZE + body_len {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    let body = src.split_to(body_len).freeze();

    decode_body(code, body).map(Some)
}

fn decode_body(code: OpCode, body: Bytes) -> Result<Op> {
    match code {
        OpCode::Open => {
            if body.len() != 1 {
                return Err(WireError::Malformed { op: "open" });
            }
            Ok(Op::Open { instance: body[0] })
        }
        OpCode::Select => Ok(Op::Select {
            channel: decode_u32_le(&body, "select")?,
        }),
        OpCode::Write => Ok(Op::Write { payload: body }),
        OpCode::Read => Ok(Op::Read {
            capacity: decode_u32_le(&body, "read")?,
        }),
        OpCode::Ok => Ok(Op::Ok { payload: body }),
        OpCode::Err => {
            let (raw_code, detail) = body
                .split_first()
                .ok_or(WireError::Malformed { op: "err" })?;
            let code =
                ErrorCode::from_u8(*raw_code).ok_or(WireError::Malformed { op: "err" })?;
            let detail = String::from_utf8(detail.to_vec())
                .map_err(|_| WireError::Malformed { op: "err" })?;
            Ok(Op::Err { code, detail })
        }
    }
}

fn decode_u32_le(body: &[u8], op: &'static str) -> Result<u32> {
    match body {
        [a, b, c, d] => Ok(u32::from_le_bytes([*a, *b, *c, *d])),
        _ => Err(WireError::Malformed { op }),
    }
}

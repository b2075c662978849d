//! Request encoding
//!
//! Serializes an argument list into the RESP request frame.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{RespError, Result};

/// Encode a command invocation to its wire frame
///
/// Format: `*<argc>\r\n` followed by `$<len>\r\n<arg>\r\n` per argument.
/// Lengths are byte lengths. Pure and deterministic; the only rejected
/// input is an empty argument list, which has no wire representation.
pub fn encode_request<S: AsRef<str>>(args: &[S]) -> Result<Bytes> {
    if args.is_empty() {
        return Err(RespError::Protocol(
            "cannot encode a request with zero arguments".to_string(),
        ));
    }

    // *1\r\n + per-arg overhead; close enough to avoid most reallocation
    let payload_len: usize = args.iter().map(|a| a.as_ref().len() + 16).sum();
    let mut buf = BytesMut::with_capacity(16 + payload_len);

    buf.put_u8(b'*');
    buf.put_slice(args.len().to_string().as_bytes());
    buf.put_slice(b"\r\n");

    for arg in args {
        let arg = arg.as_ref();
        buf.put_u8(b'$');
        buf.put_slice(arg.len().to_string().as_bytes());
        buf.put_slice(b"\r\n");
        buf.put_slice(arg.as_bytes());
        buf.put_slice(b"\r\n");
    }

    Ok(buf.freeze())
}

//! Reply decoding
//!
//! Reads one complete reply (possibly recursively nested) from a buffered
//! byte stream, leaving the cursor positioned immediately after it.
//!
//! ## Error mapping
//! - A server error frame (`-...`) decodes to `RespError::Server` carrying
//!   the message text; the stream itself is still in sync afterwards.
//! - Malformed input (unknown tag, bad length, invalid UTF-8, oversized
//!   input) decodes to `RespError::Protocol`.
//! - Underlying read failures surface as `RespError::Io`; a clean EOF at a
//!   point where more bytes are required maps to `UnexpectedEof`.
//!
//! The caller (the connection owner) decides what an error means for the
//! connection; this module only reads.

use std::io::{BufRead, Read};

use crate::error::{RespError, Result};

use super::Reply;

/// Maximum array nesting depth accepted from a peer
pub const MAX_DEPTH: usize = 32;

/// Maximum accepted length of a single wire line (16 MB)
pub const MAX_LINE_LEN: usize = 16 * 1024 * 1024;

/// Maximum accepted element count for a single array reply
pub const MAX_ARRAY_LEN: usize = 1024 * 1024;

// =============================================================================
// Reply Decoding
// =============================================================================

/// Decode exactly one reply from the stream
///
/// Blocks until a complete reply has been read or an error occurs. On
/// success the stream cursor sits immediately after the reply, so replies
/// can be read back to back (pipelining relies on this).
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    read_reply_at_depth(reader, 0)
}

fn read_reply_at_depth<R: BufRead>(reader: &mut R, depth: usize) -> Result<Reply> {
    if depth > MAX_DEPTH {
        return Err(RespError::Protocol(format!(
            "reply nesting exceeds {} levels",
            MAX_DEPTH
        )));
    }

    let tag = read_tag(reader)?;
    match tag {
        b':' => {
            let line = read_line(reader)?;
            let n = parse_int(&line)?;
            Ok(Reply::Integer(n))
        }

        b'+' => {
            let line = read_line(reader)?;
            Ok(Reply::Simple(line))
        }

        b'$' => {
            let line = read_line(reader)?;
            let len = parse_int(&line)?;
            match len {
                -1 => Ok(Reply::Nil),
                n if n >= 0 => {
                    // The payload line must be consumed for every
                    // non-negative length, including 0 (an empty bulk is
                    // still followed by its own \r\n terminator).
                    let payload = read_line(reader)?;
                    Ok(Reply::Bulk(payload))
                }
                n => Err(RespError::Protocol(format!(
                    "invalid bulk length: {}",
                    n
                ))),
            }
        }

        b'*' => {
            let line = read_line(reader)?;
            let count = parse_int(&line)?;
            match count {
                -1 => Ok(Reply::Nil),
                0 => Ok(Reply::Array(Vec::new())),
                n if n > 0 => {
                    let n = n as usize;
                    if n > MAX_ARRAY_LEN {
                        return Err(RespError::Protocol(format!(
                            "array count {} exceeds limit {}",
                            n, MAX_ARRAY_LEN
                        )));
                    }
                    let mut items = Vec::with_capacity(n.min(1024));
                    for _ in 0..n {
                        // Any nested failure fails the whole array decode.
                        items.push(read_reply_at_depth(reader, depth + 1)?);
                    }
                    Ok(Reply::Array(items))
                }
                n => Err(RespError::Protocol(format!(
                    "invalid array count: {}",
                    n
                ))),
            }
        }

        b'-' => {
            let message = read_line(reader)?;
            Err(RespError::Server(message))
        }

        other => Err(RespError::Protocol(format!(
            "unexpected reply tag byte: 0x{:02x}",
            other
        ))),
    }
}

// =============================================================================
// Line-level helpers
// =============================================================================

/// Read the single leading tag byte of a reply
fn read_tag<R: Read>(reader: &mut R) -> Result<u8> {
    let mut tag = [0u8; 1];
    reader.read_exact(&mut tag)?;
    Ok(tag[0])
}

/// Read one `\r\n`-terminated line, returning it with the terminator
/// stripped
///
/// Lines longer than `MAX_LINE_LEN` are rejected before they can exhaust
/// memory; a stream that ends mid-line maps to `UnexpectedEof`.
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    let mut bounded = reader.take((MAX_LINE_LEN + 2) as u64);
    bounded.read_until(b'\n', &mut buf)?;

    match buf.last() {
        Some(b'\n') => {}
        Some(_) if buf.len() > MAX_LINE_LEN => {
            return Err(RespError::Protocol(format!(
                "line exceeds {} bytes",
                MAX_LINE_LEN
            )));
        }
        _ => {
            return Err(RespError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stream ended mid-reply",
            )));
        }
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    String::from_utf8(buf)
        .map_err(|_| RespError::Protocol("reply line is not valid UTF-8".to_string()))
}

/// Parse a length/count/integer line as a signed decimal
fn parse_int(line: &str) -> Result<i64> {
    line.trim().parse::<i64>().map_err(|_| {
        RespError::Protocol(format!("expected an integer line, got {:?}", line))
    })
}

//! Protocol Module
//!
//! Defines the RESP wire protocol for client-server communication.
//!
//! ## Request Format
//! ```text
//! *<argc>\r\n
//! $<len(arg_1)>\r\n
//! <arg_1>\r\n
//! ...
//! $<len(arg_N)>\r\n
//! <arg_N>\r\n
//! ```
//! Lengths are byte lengths in ASCII decimal. Arguments pass through
//! verbatim, no escaping.
//!
//! ## Reply Format
//!
//! One leading tag byte selects the reply form:
//!
//! | Tag | Meaning        | Payload                                        |
//! |-----|----------------|------------------------------------------------|
//! | `:` | Integer        | signed decimal, line-terminated                |
//! | `+` | Simple status  | text, line-terminated                          |
//! | `$` | Bulk text      | length line, then payload line; `-1` means nil |
//! | `*` | Array          | count line, then that many nested replies      |
//! | `-` | Error          | message text, line-terminated                  |
//!
//! All lines terminate with `\r\n`. Bulk length `-1` and array count `-1`
//! signal an absent (nil) value, distinct from length/count `0` which mean
//! empty text and an empty array respectively.

mod reply;
mod encode;
mod decode;

pub use reply::Reply;
pub use encode::encode_request;
pub use decode::{read_reply, MAX_DEPTH, MAX_LINE_LEN, MAX_ARRAY_LEN};

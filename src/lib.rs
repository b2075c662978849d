//! # miniresp
//!
//! A minimal RESP (REdis Serialization Protocol) client with:
//! - Text-framed request encoding
//! - Recursive, type-tagged reply decoding
//! - Lazy connect with ping-probe health checks and transparent reconnect
//! - Pipelining (submit many requests, drain replies in submission order)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client                               │
//! │        (call dispatcher + pipeline state machine)           │
//! └───────────┬─────────────────────────────────┬───────────────┘
//!             │                                 │
//!             ▼                                 ▼
//!     ┌──────────────┐                  ┌──────────────┐
//!     │   Encoder    │                  │  Connection  │
//!     │  (requests)  │                  │ (TCP + buf)  │
//!     └──────────────┘                  └──────┬───────┘
//!                                              │
//!                                              ▼
//!                                      ┌──────────────┐
//!                                      │   Decoder    │
//!                                      │  (replies)   │
//!                                      └──────────────┘
//! ```
//!
//! ## Concurrency Model
//!
//! A `Client` owns exactly one connection and performs blocking I/O; every
//! method takes `&mut self`. There is no internal locking: callers that need
//! concurrent access must serialize externally (one client per worker, or an
//! external mutex).

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RespError, Result};
pub use config::Config;
pub use protocol::Reply;
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of miniresp
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Network Module
//!
//! Client-side TCP connection handling.
//!
//! ## Architecture
//! - One `Connection` per client instance
//! - Buffered read half, unbuffered write half
//! - Lifecycle (dial, probe, teardown) driven by the `Client`

mod connection;

pub use connection::Connection;

//! Client Module
//!
//! The client that coordinates all components.
//!
//! ## Responsibilities
//! - Lazy connection establishment with ping-probe health checks
//! - Encoding and writing requests, decoding replies
//! - Pipeline mode: defer reads, drain them in submission order
//! - Tearing the connection down on any I/O or protocol failure
//!
//! ## State Machine
//!
//! ```text
//!          pipeline()                    execute()
//!   Idle ─────────────► Batching ─────────────────► Idle
//!    ▲                  │  call() increments the
//!    │                  │  pending-reply counter
//!    └──────────────────┘
//!      any I/O / decode error tears the connection
//!      down and resets to Idle with counter 0
//! ```

use crate::config::Config;
use crate::error::{RespError, Result};
use crate::network::Connection;
use crate::protocol::{encode_request, Reply};

/// A client for a RESP key-value server
///
/// Owns exactly one connection, created lazily on first use and recreated
/// transparently after a failure. Not safe for concurrent use; every
/// method takes `&mut self` and callers must serialize access themselves.
pub struct Client {
    /// Target server address
    config: Config,

    /// Current connection, absent until first use or after a teardown
    conn: Option<Connection>,

    /// Whether pipeline (batching) mode is active
    pipeline: bool,

    /// Replies written but not yet read; non-zero only while pipelining
    pending: usize,
}

impl Client {
    /// Create a client for the given host and port
    ///
    /// Does not connect; the connection is established on first use.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(Config::new(host, port))
    }

    /// Create a client from a config
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            conn: None,
            pipeline: false,
            pending: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Connection lifecycle
    // -------------------------------------------------------------------------

    /// Make sure a usable connection exists
    ///
    /// While pipelining with a live connection this is a no-op: probing
    /// would read a reply out of sequence with the pending batch. Otherwise
    /// a missing or probe-failing connection is torn down and redialed.
    fn ensure_connected(&mut self) -> Result<()> {
        if self.pipeline && self.conn.is_some() {
            return Ok(());
        }

        if self.conn.is_none() || !self.probe() {
            self.teardown();
            self.conn = Some(Connection::open(&self.config.addr())?);
        }

        Ok(())
    }

    /// Health-check the current connection with a ping round trip
    ///
    /// False when no connection exists or the exchange fails for any
    /// reason; the caller decides whether to redial.
    fn probe(&mut self) -> bool {
        let Some(conn) = self.conn.as_mut() else {
            return false;
        };

        let Ok(frame) = encode_request(&["ping"]) else {
            return false;
        };

        conn.send(&frame).is_ok() && conn.read_reply().is_ok()
    }

    /// Tear down the connection and reset to the initial state
    ///
    /// Closes the stream if one exists, discards the read buffer, and
    /// resets pipeline mode and the pending-reply counter. Idempotent.
    pub fn teardown(&mut self) {
        if self.conn.is_some() {
            tracing::debug!("Tearing down connection to {}", self.config.addr());
        }

        self.conn = None;
        self.pipeline = false;
        self.pending = 0;
    }

    // -------------------------------------------------------------------------
    // Call dispatch
    // -------------------------------------------------------------------------

    /// Send one command through the connection
    ///
    /// The single entry point every command flows through. Outside pipeline
    /// mode this writes the request and synchronously reads its reply,
    /// returning `Some(reply)`. In pipeline mode it writes the request,
    /// counts the deferred reply, and returns `Ok(None)`; the reply is
    /// observed later via [`execute`](Self::execute).
    pub fn call<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Option<Reply>> {
        // Encoding is pure; doing it first keeps the pending counter from
        // counting a request that never had a wire representation.
        let frame = encode_request(args)?;

        if self.pipeline {
            self.pending += 1;
        }

        if let Err(e) = self.ensure_connected() {
            self.teardown();
            return Err(e);
        }

        if let Some(name) = args.first() {
            tracing::trace!("Sending command {:?} ({} bytes)", name.as_ref(), frame.len());
        }

        let Some(conn) = self.conn.as_mut() else {
            return Err(RespError::Connection("not connected".to_string()));
        };

        if let Err(e) = conn.send(&frame) {
            tracing::warn!("Write to {} failed: {}", conn.peer_addr(), e);
            self.teardown();
            return Err(e);
        }

        if self.pipeline {
            return Ok(None);
        }

        self.read_one().map(Some)
    }

    /// Read one reply, tearing down on anything but a server error frame
    fn read_one(&mut self) -> Result<Reply> {
        let result = match self.conn.as_mut() {
            Some(conn) => conn.read_reply(),
            None => Err(RespError::Connection("not connected".to_string())),
        };

        if let Err(ref e) = result {
            if e.is_fatal() {
                tracing::warn!("Reply read failed: {}", e);
                self.teardown();
            }
        }

        result
    }

    // -------------------------------------------------------------------------
    // Pipelining
    // -------------------------------------------------------------------------

    /// Enter pipeline mode
    ///
    /// Ensures a connection exists (one probe round trip), then switches
    /// subsequent [`call`](Self::call)s to write-and-defer. Replies
    /// accumulate on the stream until [`execute`](Self::execute) drains
    /// them.
    pub fn pipeline(&mut self) -> Result<()> {
        if let Err(e) = self.ensure_connected() {
            self.teardown();
            return Err(e);
        }

        self.pipeline = true;
        Ok(())
    }

    /// Drain the pipeline
    ///
    /// Reads exactly as many replies as commands were submitted since
    /// [`pipeline`](Self::pipeline), in submission order, and leaves the
    /// client in idle mode. Any failure aborts the drain, tears the
    /// connection down, and discards replies already decoded: a partial
    /// sequence could not be aligned with the submitted commands.
    pub fn execute(&mut self) -> Result<Vec<Reply>> {
        let expected = self.pending;
        let mut replies = Vec::with_capacity(expected);

        for _ in 0..expected {
            let result = match self.conn.as_mut() {
                Some(conn) => conn.read_reply(),
                None => Err(RespError::Connection("not connected".to_string())),
            };

            match result {
                Ok(reply) => replies.push(reply),
                Err(e) => {
                    // A server error frame would normally leave the
                    // connection usable, but aborting mid-drain leaves
                    // unread replies on the stream, so everything goes.
                    tracing::warn!("Pipeline drain failed: {}", e);
                    self.teardown();
                    return Err(e);
                }
            }
        }

        self.pipeline = false;
        self.pending = 0;

        Ok(replies)
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// `BLPOP key secs`: pop from a list, blocking up to `secs` seconds
    pub fn blpop(&mut self, key: &str, secs: u64) -> Result<Option<Reply>> {
        let secs = secs.to_string();
        self.call(&["blpop", key, secs.as_str()])
    }

    /// `RPUSH key element`: append an element to a list
    pub fn rpush(&mut self, key: &str, element: &str) -> Result<Option<Reply>> {
        self.call(&["rpush", key, element])
    }

    /// `SET key value`
    pub fn set(&mut self, key: &str, value: &str) -> Result<Option<Reply>> {
        self.call(&["set", key, value])
    }

    /// `GET key`
    pub fn get(&mut self, key: &str) -> Result<Option<Reply>> {
        self.call(&["get", key])
    }

    /// `SADD set value [value ...]`: add members to a set
    pub fn sadd(&mut self, set: &str, values: &[&str]) -> Result<Option<Reply>> {
        let mut args = vec!["sadd", set];
        args.extend_from_slice(values);
        self.call(&args)
    }

    /// `SMEMBERS set`: all members of a set
    pub fn smembers(&mut self, set: &str) -> Result<Option<Reply>> {
        self.call(&["smembers", set])
    }

    /// `SISMEMBER set value`: 1 if `value` is a member, else 0
    pub fn sismember(&mut self, set: &str, value: &str) -> Result<Option<Reply>> {
        self.call(&["sismember", set, value])
    }

    /// `SREM set value [value ...]`: remove members from a set
    pub fn srem(&mut self, set: &str, values: &[&str]) -> Result<Option<Reply>> {
        let mut args = vec!["srem", set];
        args.extend_from_slice(values);
        self.call(&args)
    }

    /// `DEL key`
    pub fn del(&mut self, key: &str) -> Result<Option<Reply>> {
        self.call(&["del", key])
    }

    /// `PING`: explicit health probe round trip
    pub fn ping(&mut self) -> Result<Option<Reply>> {
        self.call(&["ping"])
    }
}

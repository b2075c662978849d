//! Connection handling
//!
//! Owns the TCP stream to the server and the buffered reader over it.

use std::io::{BufReader, Write};
use std::net::TcpStream;

use crate::error::{RespError, Result};
use crate::protocol::{read_reply, Reply};

/// A live connection to the server
///
/// The read half is buffered because the decoder works line by line; the
/// write half stays unbuffered so each request frame is flushed in one
/// `write_all`. Dropping the connection closes the stream.
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer
    writer: TcpStream,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Dial the server and set up buffered I/O
    pub fn open(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| RespError::Connection(format!("dial {}: {}", addr, e)))?;

        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connection established to {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: write_stream,
            peer_addr,
        })
    }

    /// Write one encoded request frame to the server
    pub fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.writer.write_all(frame)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Read exactly one reply from the server
    pub fn read_reply(&mut self) -> Result<Reply> {
        read_reply(&mut self.reader)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        tracing::debug!("Connection to {} closed", self.peer_addr);
    }
}

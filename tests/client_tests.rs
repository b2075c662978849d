//! Client Tests
//!
//! Exercises connection lifecycle, call dispatch, and pipelining against an
//! in-process scripted server.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use miniresp::{Client, Reply, RespError};

// =============================================================================
// Scripted Server
// =============================================================================

/// Sentinel script entry: drop the current connection instead of replying
const CLOSE: &str = "<close>";

/// Spawn a server that answers `ping` with `+PONG` and every other request
/// with the next scripted reply, across reconnects
///
/// Ping gets a fixed answer because the client probes existing connections
/// before every non-pipelined command; scripting those would couple tests
/// to the probe schedule.
fn spawn_server(script: Vec<&'static str>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        let mut script = script.into_iter();
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => serve(stream, &mut script),
                Err(_) => return,
            }
        }
    });

    port
}

/// Spawn a server that accepts exactly one connection
///
/// A client that drops its connection and redials gets a refused dial,
/// so tests can prove the connection was reused.
fn spawn_single_connection_server(script: Vec<&'static str>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        drop(listener);

        let mut script = script.into_iter();
        serve(stream, &mut script);
    });

    port
}

fn serve(stream: TcpStream, script: &mut dyn Iterator<Item = &'static str>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = stream;

    while let Some(args) = read_request(&mut reader) {
        let is_ping = args
            .first()
            .map(|a| a.eq_ignore_ascii_case("ping"))
            .unwrap_or(false);

        let reply = if is_ping {
            "+PONG\r\n"
        } else {
            script.next().unwrap_or("-ERR script exhausted\r\n")
        };

        if reply == CLOSE {
            return;
        }
        if writer.write_all(reply.as_bytes()).is_err() {
            return;
        }
    }
}

/// Read one `*N` request frame, returning its arguments
fn read_request(reader: &mut BufReader<TcpStream>) -> Option<Vec<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line).ok()? == 0 {
        return None;
    }

    let argc: usize = line.trim().strip_prefix('*')?.parse().ok()?;
    let mut args = Vec::with_capacity(argc);
    for _ in 0..argc {
        let mut len_line = String::new();
        reader.read_line(&mut len_line).ok()?;
        let mut arg = String::new();
        reader.read_line(&mut arg).ok()?;
        args.push(arg.trim_end().to_string());
    }

    Some(args)
}

// =============================================================================
// Basic Command Scenarios
// =============================================================================

#[test]
fn test_set_get_del() {
    let port = spawn_server(vec!["+OK\r\n", "$1\r\nv\r\n", ":1\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    let reply = client.set("k", "v").unwrap().unwrap();
    assert_eq!(reply, Reply::Simple("OK".to_string()));

    let reply = client.get("k").unwrap().unwrap();
    assert_eq!(reply, Reply::Bulk("v".to_string()));

    let reply = client.del("k").unwrap().unwrap();
    assert_eq!(reply, Reply::Integer(1));
}

#[test]
fn test_set_membership() {
    // Second sadd reports 2: the duplicate "c" is not counted as newly
    // added, only "d" and "e" are
    let port = spawn_server(vec![
        ":3\r\n",
        ":2\r\n",
        ":1\r\n",
        ":0\r\n",
        "*3\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\nc\r\n",
        ":1\r\n",
    ]);
    let mut client = Client::new("127.0.0.1", port);

    assert_eq!(
        client.sadd("s", &["a", "b", "c"]).unwrap().unwrap(),
        Reply::Integer(3)
    );
    assert_eq!(
        client.sadd("s", &["c", "d", "e"]).unwrap().unwrap(),
        Reply::Integer(2)
    );
    assert_eq!(
        client.sismember("s", "a").unwrap().unwrap(),
        Reply::Integer(1)
    );
    assert_eq!(
        client.sismember("s", "z").unwrap().unwrap(),
        Reply::Integer(0)
    );

    let members = client.smembers("s").unwrap().unwrap();
    assert_eq!(
        members,
        Reply::Array(vec![
            Reply::Bulk("a".to_string()),
            Reply::Bulk("b".to_string()),
            Reply::Bulk("c".to_string()),
        ])
    );

    assert_eq!(
        client.srem("s", &["a"]).unwrap().unwrap(),
        Reply::Integer(1)
    );
}

#[test]
fn test_blocking_pop_empty_then_populated() {
    let port = spawn_server(vec![
        "*-1\r\n",
        ":1\r\n",
        "*2\r\n$1\r\nq\r\n$1\r\nx\r\n",
    ]);
    let mut client = Client::new("127.0.0.1", port);

    // Empty list: the blocking pop times out and yields nil
    let reply = client.blpop("q", 1).unwrap().unwrap();
    assert!(reply.is_nil());

    assert_eq!(
        client.rpush("q", "x").unwrap().unwrap(),
        Reply::Integer(1)
    );

    // Populated list: a two-element [key, value] sequence
    let reply = client.blpop("q", 1).unwrap().unwrap();
    assert_eq!(
        reply,
        Reply::Array(vec![
            Reply::Bulk("q".to_string()),
            Reply::Bulk("x".to_string()),
        ])
    );
}

#[test]
fn test_nil_and_empty_bulk_stay_distinct() {
    let port = spawn_server(vec!["$-1\r\n", "$0\r\n\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    let missing = client.get("missing").unwrap().unwrap();
    assert!(missing.is_nil());

    let empty = client.get("empty").unwrap().unwrap();
    assert_eq!(empty, Reply::Bulk(String::new()));
    assert!(!empty.is_nil());
}

#[test]
fn test_ping() {
    let port = spawn_server(vec![]);
    let mut client = Client::new("127.0.0.1", port);

    let reply = client.ping().unwrap().unwrap();
    assert_eq!(reply, Reply::Simple("PONG".to_string()));
}

// =============================================================================
// Pipelining
// =============================================================================

#[test]
fn test_pipeline_drains_in_submission_order() {
    let port = spawn_server(vec!["+OK\r\n", "$1\r\n1\r\n", ":1\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    client.pipeline().unwrap();

    // Pipelined submissions return no value and no error
    assert!(client.set("k", "1").unwrap().is_none());
    assert!(client.get("k").unwrap().is_none());
    assert!(client.del("k").unwrap().is_none());

    let replies = client.execute().unwrap();
    assert_eq!(
        replies,
        vec![
            Reply::Simple("OK".to_string()),
            Reply::Bulk("1".to_string()),
            Reply::Integer(1),
        ]
    );
}

#[test]
fn test_empty_pipeline_drain() {
    let port = spawn_server(vec![]);
    let mut client = Client::new("127.0.0.1", port);

    client.pipeline().unwrap();
    let replies = client.execute().unwrap();
    assert!(replies.is_empty());
}

#[test]
fn test_pipeline_usable_again_after_drain() {
    let port = spawn_server(vec![":1\r\n", ":2\r\n", "+OK\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    client.pipeline().unwrap();
    client.rpush("q", "a").unwrap();
    client.rpush("q", "b").unwrap();
    let replies = client.execute().unwrap();
    assert_eq!(replies, vec![Reply::Integer(1), Reply::Integer(2)]);

    // Back in idle mode: calls read their reply synchronously again
    let reply = client.set("k", "v").unwrap().unwrap();
    assert_eq!(reply, Reply::Simple("OK".to_string()));
}

#[test]
fn test_pipeline_drain_failure_discards_partial_results() {
    // Second reply is malformed; the whole drain fails even though the
    // first reply decoded cleanly
    let port = spawn_server(vec![":1\r\n", "?bogus\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    client.pipeline().unwrap();
    client.rpush("q", "a").unwrap();
    client.rpush("q", "b").unwrap();

    assert!(matches!(client.execute(), Err(RespError::Protocol(_))));

    // The failed drain reset pipeline state: a fresh drain has nothing to read
    let replies = client.execute().unwrap();
    assert!(replies.is_empty());
}

// =============================================================================
// Error Handling and Teardown
// =============================================================================

#[test]
fn test_server_error_surfaced_without_teardown() {
    // Single-connection server: if the client tore the connection down and
    // redialed, the second command would fail
    let port = spawn_single_connection_server(vec!["-ERR boom\r\n", "+OK\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    match client.get("k") {
        Err(RespError::Server(msg)) => assert_eq!(msg, "ERR boom"),
        other => panic!("Expected server error, got {:?}", other),
    }

    // Same connection still works
    let reply = client.set("k", "v").unwrap().unwrap();
    assert_eq!(reply, Reply::Simple("OK".to_string()));
}

#[test]
fn test_decode_error_tears_down_and_reconnects() {
    let port = spawn_server(vec!["?bogus\r\n", "$1\r\nv\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    assert!(matches!(client.get("k"), Err(RespError::Protocol(_))));

    // Next call transparently reconnects and completes
    let reply = client.get("k").unwrap().unwrap();
    assert_eq!(reply, Reply::Bulk("v".to_string()));
}

#[test]
fn test_reconnect_after_peer_closes_connection() {
    let port = spawn_server(vec!["+OK\r\n", CLOSE, "$1\r\nv\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    let reply = client.set("k", "v").unwrap().unwrap();
    assert_eq!(reply, Reply::Simple("OK".to_string()));

    // The server drops the connection instead of replying
    assert!(client.get("k").is_err());

    // Next call dials a fresh connection and the script continues
    let reply = client.get("k").unwrap().unwrap();
    assert_eq!(reply, Reply::Bulk("v".to_string()));
}

#[test]
fn test_teardown_is_idempotent() {
    let port = spawn_server(vec!["+OK\r\n"]);
    let mut client = Client::new("127.0.0.1", port);

    // Never connected: teardown is a no-op
    client.teardown();
    client.teardown();

    client.set("k", "v").unwrap();

    client.teardown();
    client.teardown();
}

#[test]
fn test_dial_failure_surfaces_connection_error() {
    // Bind then drop to get a port nothing is listening on
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut client = Client::new("127.0.0.1", port);

    assert!(matches!(
        client.get("k"),
        Err(RespError::Connection(_))
    ));
}

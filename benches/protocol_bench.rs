//! Benchmarks for miniresp protocol operations

use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use miniresp::protocol::{encode_request, read_reply};

fn protocol_benchmarks(c: &mut Criterion) {
    c.bench_function("encode_set_request", |b| {
        b.iter(|| encode_request(black_box(&["set", "benchmark-key", "benchmark-value"])).unwrap())
    });

    // A 100-element bulk array, the shape of a large smembers reply
    let mut wire = String::from("*100\r\n");
    for i in 0..100 {
        let member = format!("member-{}", i);
        wire.push_str(&format!("${}\r\n{}\r\n", member.len(), member));
    }

    c.bench_function("decode_array_reply", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(wire.as_bytes()));
            read_reply(&mut cursor).unwrap()
        })
    });

    c.bench_function("decode_integer_reply", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(b":1000\r\n".as_slice()));
            read_reply(&mut cursor).unwrap()
        })
    });
}

criterion_group!(benches, protocol_benchmarks);
criterion_main!(benches);

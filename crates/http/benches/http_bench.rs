use std::hint::black_box;

use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, Criterion};
use micro_http_message::codec::{
    parse_request, parse_response, write_response, FixedSink, GrowableSink, ResponseEncoder,
};
use micro_http_message::protocol::{HttpResponse, StatusLine, Version};
use tokio_util::codec::Encoder;

fn hello_response() -> HttpResponse {
    HttpResponse::builder()
        .with_protocol(StatusLine::new(Version::Http11, 200, "OK"))
        .with_header(("Server", "MyTestServer"))
        .with_header(("Content-Type", "text/plain"))
        .with_header(("Content-Length", "12"))
        .build_with_body("Hello World!")
}

fn bench_parse_request(c: &mut Criterion) {
    let request = b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n";

    c.bench_function("parse_simple_request", |b| {
        b.iter(|| black_box(parse_request(black_box(request)).unwrap()));
    });
}

fn bench_parse_chunked_response(c: &mut Criterion) {
    let response = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nHello\r\n7\r\n World!\r\n0\r\n\r\n";

    c.bench_function("parse_chunked_response", |b| {
        b.iter(|| black_box(parse_response(black_box(response)).unwrap()));
    });
}

fn bench_write_response(c: &mut Criterion) {
    let response = hello_response();

    c.bench_function("write_response_growable", |b| {
        b.iter(|| {
            let mut sink = GrowableSink::new();
            black_box(write_response(&response, &mut sink).unwrap());
        });
    });

    c.bench_function("write_response_fixed", |b| {
        let mut buf = [0u8; 256];
        b.iter(|| {
            let mut sink = FixedSink::new(&mut buf);
            black_box(write_response(&response, &mut sink).unwrap());
        });
    });

    c.bench_function("encode_simple_response", |b| {
        b.iter(|| {
            let mut encoder = ResponseEncoder::new();
            let mut bytes = BytesMut::new();
            encoder.encode(&response, &mut bytes).unwrap();
            black_box(bytes);
        });
    });
}

criterion_group!(benches, bench_parse_request, bench_parse_chunked_response, bench_write_response);
criterion_main!(benches);

use micro_http_message::codec::{parse_request, parse_response, write_response, FixedSink};
use micro_http_message::protocol::{HttpResponse, StatusLine, Version};

use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let input = b"GET /index HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n";
    match parse_request(input) {
        Ok((request, consumed)) => {
            info!(method = %request.method(), path = request.path(), consumed, "parsed request");
            for header in request.headers() {
                info!(name = ?header.name(), value = ?header.value(), "header");
            }
        }
        Err(e) => error!(cause = %e, "failed to parse request"),
    }

    let response = HttpResponse::builder()
        .with_protocol(StatusLine::new(Version::Http11, 200, "OK"))
        .with_header(("Server", "MyTestServer"))
        .with_header(("Content-Length", "13"))
        .with_header(("Content-Type", "text/plain"))
        .build_with_body("Hello, World!");

    let wire = match response.to_bytes() {
        Ok(wire) => wire,
        Err(e) => {
            error!(cause = %e, "failed to serialize response");
            return;
        }
    };
    info!(len = wire.len(), "serialized response");

    match parse_response(&wire) {
        Ok((parsed, _)) if parsed == response => info!(status = parsed.status_code(), "response round trip ok"),
        Ok((parsed, _)) => warn!(?parsed, "response changed after round trip"),
        Err(e) => error!(cause = %e, "failed to parse response"),
    }

    match http::Response::<bytes::Bytes>::try_from(&response) {
        Ok(converted) => info!(status = %converted.status(), "converted to http::Response"),
        Err(e) => warn!(cause = %e, "failed to convert response"),
    }

    let mut small = [0u8; 16];
    if let Err(e) = write_response(&response, &mut FixedSink::new(&mut small)) {
        warn!(cause = %e, "fixed buffer too small");
    }

    if let Err(e) = parse_request(b"GET /index HTTP/1.1\r\nHost: exa") {
        info!(code = e.code(), identifier = e.identifier(), category = e.category(), cause = %e, "truncated request rejected");
    }
}

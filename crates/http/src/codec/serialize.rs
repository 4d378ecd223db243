//! Rendering messages back to HTTP/1.x wire bytes.
//!
//! Output is the start line, every header as `name: value` in stored order, a blank line and
//! the body verbatim. Nothing is added or rewritten: no `Content-Length` is injected and bodies
//! are never chunk-encoded.

use bytes::Bytes;

use crate::codec::sink::{GrowableSink, WireSink};
use crate::protocol::{Header, HttpRequest, HttpResponse, SendError};

const CRLF: &[u8] = b"\r\n";

/// Writes `request` into `sink` and returns the number of bytes written.
///
/// The whole message is reserved up front, so a sink that cannot hold it is left untouched.
pub fn write_request<S: WireSink + ?Sized>(request: &HttpRequest, sink: &mut S) -> Result<usize, SendError> {
    let line = request.request_line();
    let len = line.method.as_str().len()
        + 1
        + line.path.len()
        + 1
        + line.version.as_str().len()
        + CRLF.len()
        + tail_len(request.headers(), request.body());
    sink.reserve_bytes(len)?;

    sink.write_slice(line.method.as_str().as_bytes())?;
    sink.write_slice(b" ")?;
    sink.write_slice(line.path.as_bytes())?;
    sink.write_slice(b" ")?;
    sink.write_slice(line.version.as_str().as_bytes())?;
    sink.write_slice(CRLF)?;
    write_tail(sink, request.headers(), request.body())?;
    Ok(len)
}

/// Writes `response` into `sink` and returns the number of bytes written.
pub fn write_response<S: WireSink + ?Sized>(response: &HttpResponse, sink: &mut S) -> Result<usize, SendError> {
    let line = response.status_line();
    let (digits, start) = status_digits(line.status_code);
    let code = &digits[start..];

    let len = line.version.as_str().len()
        + 1
        + code.len()
        + 1
        + line.status_text.len()
        + CRLF.len()
        + tail_len(response.headers(), response.body());
    sink.reserve_bytes(len)?;

    sink.write_slice(line.version.as_str().as_bytes())?;
    sink.write_slice(b" ")?;
    sink.write_slice(code)?;
    sink.write_slice(b" ")?;
    sink.write_slice(line.status_text.as_bytes())?;
    sink.write_slice(CRLF)?;
    write_tail(sink, response.headers(), response.body())?;
    Ok(len)
}

fn tail_len(headers: &[Header], body: &Bytes) -> usize {
    headers.iter().map(Header::wire_len).sum::<usize>() + CRLF.len() + body.len()
}

fn write_tail<S: WireSink + ?Sized>(sink: &mut S, headers: &[Header], body: &Bytes) -> Result<(), SendError> {
    for header in headers {
        sink.write_slice(header.name())?;
        sink.write_slice(b": ")?;
        sink.write_slice(header.value())?;
        sink.write_slice(CRLF)?;
    }
    sink.write_slice(CRLF)?;
    sink.write_slice(body)
}

/// Decimal digits of `code`, right aligned; the digits start at the returned index.
fn status_digits(code: u16) -> ([u8; 5], usize) {
    let mut digits = [b'0'; 5];
    let mut start = digits.len();
    let mut rest = code;
    loop {
        start -= 1;
        digits[start] = b'0' + (rest % 10) as u8;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    (digits, start)
}

impl HttpRequest {
    /// Serializes the request into a new buffer.
    pub fn to_bytes(&self) -> Result<Bytes, SendError> {
        let mut sink = GrowableSink::new();
        write_request(self, &mut sink)?;
        Ok(sink.into_inner().freeze())
    }
}

impl HttpResponse {
    /// Serializes the response into a new buffer.
    pub fn to_bytes(&self) -> Result<Bytes, SendError> {
        let mut sink = GrowableSink::new();
        write_response(self, &mut sink)?;
        Ok(sink.into_inner().freeze())
    }
}

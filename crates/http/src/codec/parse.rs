//! One-shot parsing of a complete HTTP/1.x message.
//!
//! Each call drives a fresh [`Tokenizer`] over the whole buffer, then runs it once more with
//! an empty slice to signal end of stream. Only when both runs succeed are the recorded slices
//! copied out into an owned [`HttpRequest`] or [`HttpResponse`]; on failure nothing is built.

use bytes::BytesMut;
use tracing::{debug, warn};

use crate::codec::collector::EventCollector;
use crate::codec::tokenizer::{Errno, Mode, Tokenizer};
use crate::codec::ParseConfig;
use crate::protocol::{
    Header, HeaderContainer, HttpRequest, HttpResponse, Method, ParseError, ParseErrorKind, RequestLine, StatusLine,
    Version,
};

/// Parses one request from `buf` with the default limits.
///
/// Returns the request together with the number of bytes the message occupied. Bytes after the
/// first complete message are not consumed.
///
/// # Example
///
/// ```
/// use micro_http_message::codec::parse_request;
/// use micro_http_message::protocol::Method;
///
/// let (request, consumed) = parse_request(b"GET /index HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
/// assert_eq!(request.method(), Method::Get);
/// assert_eq!(request.path(), "/index");
/// assert_eq!(consumed, 42);
/// ```
pub fn parse_request(buf: &[u8]) -> Result<(HttpRequest, usize), ParseError> {
    parse_request_with(buf, ParseConfig::default())
}

/// Parses one request from `buf`, failing with `HEADER_OVERFLOW` when the start line plus
/// header section or the number of header fields exceeds the limits in `config`.
pub fn parse_request_with(buf: &[u8], config: ParseConfig) -> Result<(HttpRequest, usize), ParseError> {
    let (tokenizer, collector, consumed) = tokenize(Mode::Request, buf, config)?;

    let code = tokenizer.method().ok_or(ParseErrorKind::InvalidMethod)?;
    let Some(method) = Method::from_code(code) else {
        warn!(method_code = code, "unsupported request method");
        return Err(ParseError::invalid_method());
    };
    let version = version_of(&tokenizer)?;
    let path = String::from_utf8_lossy(collector.target().get(buf)).into_owned();

    let request = HttpRequest::builder()
        .with_protocol(RequestLine::new(method, path, version))
        .with_header_container(materialize_headers(&collector, buf))
        .build_with_body(materialize_body(&collector, buf));

    Ok((request, consumed))
}

/// Parses one response from `buf` with the default limits.
///
/// A response without `Content-Length` or chunked framing extends to the end of `buf`.
pub fn parse_response(buf: &[u8]) -> Result<(HttpResponse, usize), ParseError> {
    parse_response_with(buf, ParseConfig::default())
}

/// Parses one response from `buf` with the header limits in `config`, as
/// [`parse_request_with`] does for requests.
pub fn parse_response_with(buf: &[u8], config: ParseConfig) -> Result<(HttpResponse, usize), ParseError> {
    let (tokenizer, collector, consumed) = tokenize(Mode::Response, buf, config)?;

    let status_code = tokenizer.status_code().ok_or(ParseErrorKind::InvalidStatus)?;
    let version = version_of(&tokenizer)?;
    let status_text = String::from_utf8_lossy(collector.target().get(buf)).into_owned();

    let response = HttpResponse::builder()
        .with_protocol(StatusLine::new(version, status_code, status_text))
        .with_header_container(materialize_headers(&collector, buf))
        .build_with_body(materialize_body(&collector, buf));

    Ok((response, consumed))
}

/// Runs the tokenizer over `buf` and then over the end of stream.
fn tokenize(mode: Mode, buf: &[u8], config: ParseConfig) -> Result<(Tokenizer, EventCollector, usize), ParseError> {
    let mut tokenizer = Tokenizer::with_config(mode, config);
    let mut collector = EventCollector::new();

    let consumed = tokenizer.execute(&mut collector, buf);
    tokenizer.execute(&mut collector, &[]);

    let errno = match tokenizer.errno() {
        Errno::OK if !collector.is_complete() => Errno::INVALID_EOF_STATE,
        errno => errno,
    };

    if !errno.is_ok() {
        let error = ParseError::from(errno);
        debug!(?mode, code = error.code(), identifier = error.identifier(), consumed, "failed to parse message");
        return Err(error);
    }
    Ok((tokenizer, collector, consumed))
}

fn version_of(tokenizer: &Tokenizer) -> Result<Version, ParseError> {
    tokenizer.http_minor().and_then(Version::from_minor).ok_or_else(|| ParseErrorKind::InvalidVersion.into())
}

fn materialize_headers(collector: &EventCollector, buf: &[u8]) -> HeaderContainer {
    let mut headers = HeaderContainer::with_capacity(collector.headers().len());
    headers.extend(collector.headers().iter().map(|(name, value)| Header::copy_from_slices(name.get(buf), value.get(buf))));
    headers
}

fn materialize_body(collector: &EventCollector, buf: &[u8]) -> BytesMut {
    let mut body = BytesMut::with_capacity(collector.body_len());
    for piece in collector.body() {
        body.extend_from_slice(piece.get(buf));
    }
    body
}

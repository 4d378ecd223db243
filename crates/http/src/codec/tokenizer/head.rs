//! Start line and header section recognition.
//!
//! `httparse` validates the grammar and hands back borrowed slices; this module turns those
//! slices into callback events with offsets relative to the caller's buffer, in the same way the
//! header index of a zero-copy decoder records byte ranges.

use httparse::Status;
use tracing::trace;

use super::framing::{BodyKind, Framing};
use super::{Callbacks, Errno, Mode, State, Tokenizer};
use crate::ensure;

/// Method tokens indexed by method code.
const METHOD_TOKENS: [&str; 34] = [
    "DELETE",
    "GET",
    "HEAD",
    "POST",
    "PUT",
    "CONNECT",
    "OPTIONS",
    "TRACE",
    "COPY",
    "LOCK",
    "MKCOL",
    "MOVE",
    "PROPFIND",
    "PROPPATCH",
    "SEARCH",
    "UNLOCK",
    "BIND",
    "REBIND",
    "UNBIND",
    "ACL",
    "REPORT",
    "MKACTIVITY",
    "CHECKOUT",
    "MERGE",
    "M-SEARCH",
    "NOTIFY",
    "SUBSCRIBE",
    "UNSUBSCRIBE",
    "PATCH",
    "PURGE",
    "MKCALENDAR",
    "LINK",
    "UNLINK",
    "SOURCE",
];

const CONNECT: u8 = 5;

/// Length of `HTTP/1.1 200 `, after which the reason phrase starts.
const STATUS_PREFIX_LEN: usize = 13;

/// Shortest possible header line, `a:` followed by a bare LF.
const MIN_HEADER_LINE: usize = 3;

fn method_code(token: &str) -> Option<u8> {
    METHOD_TOKENS.iter().position(|known| *known == token).and_then(|index| u8::try_from(index).ok())
}

/// Offset of `part` inside `base`. `part` must be a sub-slice of `base` unless it is empty.
fn offset_in(base: &[u8], part: &[u8]) -> usize {
    if part.is_empty() {
        return 0;
    }
    let offset = part.as_ptr() as usize - base.as_ptr() as usize;
    debug_assert!(offset + part.len() <= base.len());
    offset
}

/// The reason phrase as raw bytes from the status line. `httparse` only hands back reasons
/// that are valid UTF-8 and reports an empty one for obs-text.
fn raw_reason(src: &[u8]) -> &[u8] {
    let line = match src.iter().position(|&b| b == b'\n') {
        Some(end) => &src[..end],
        None => src,
    };
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line.get(STATUS_PREFIX_LEN..).unwrap_or_default()
}

impl Tokenizer {
    /// Header slots to hand to `httparse`. Neither `src` nor the byte limit can hold more
    /// header lines than this, so the configured count never drives the allocation alone.
    fn header_slots(&self, src: &[u8]) -> usize {
        let fits = self.config.max_header_bytes().min(src.len()) / MIN_HEADER_LINE + 1;
        self.config.max_headers().min(fits)
    }

    pub(super) fn read_head<C: Callbacks>(
        &mut self,
        callbacks: &mut C,
        data: &[u8],
        offset: &mut usize,
    ) -> Result<(), Errno> {
        match self.mode {
            Mode::Request => self.read_request_head(callbacks, data, offset),
            Mode::Response => self.read_response_head(callbacks, data, offset),
        }
    }

    fn read_request_head<C: Callbacks>(
        &mut self,
        callbacks: &mut C,
        data: &[u8],
        offset: &mut usize,
    ) -> Result<(), Errno> {
        let src = &data[*offset..];
        let mut headers = vec![httparse::EMPTY_HEADER; self.header_slots(src)];
        let mut request = httparse::Request::new(&mut headers);

        let len = match request.parse(src) {
            Ok(Status::Complete(len)) => len,
            Ok(Status::Partial) => return self.partial_head(src.len(), data.len(), offset),
            Err(e) => return Err(request_error(e, request.method.is_some())),
        };
        ensure!(len <= self.config.max_header_bytes(), Errno::HEADER_OVERFLOW);

        let method = request.method.ok_or(Errno::INVALID_METHOD)?;
        let code = method_code(method).ok_or(Errno::INVALID_METHOD)?;
        let path = request.path.ok_or(Errno::INVALID_URL)?;
        let minor = request.version.ok_or(Errno::INVALID_VERSION)?;
        validate_target(code, path)?;

        trace!(method, path, header_count = request.headers.len(), head_size = len, "parsed request head");
        self.method = Some(code);
        self.http_minor = Some(minor);

        ensure!(callbacks.on_message_begin().is_continue(), Errno::CB_MESSAGE_BEGIN);
        let path = path.as_bytes();
        ensure!(callbacks.on_url(offset_in(data, path), path).is_continue(), Errno::CB_URL);
        emit_headers(callbacks, data, request.headers)?;

        let framing = Framing::for_request(request.headers)?;
        self.finish_head(callbacks, framing, len, offset)
    }

    fn read_response_head<C: Callbacks>(
        &mut self,
        callbacks: &mut C,
        data: &[u8],
        offset: &mut usize,
    ) -> Result<(), Errno> {
        let src = &data[*offset..];
        let mut headers = vec![httparse::EMPTY_HEADER; self.header_slots(src)];
        let mut response = httparse::Response::new(&mut headers);

        let len = match response.parse(src) {
            Ok(Status::Complete(len)) => len,
            Ok(Status::Partial) => return self.partial_head(src.len(), data.len(), offset),
            Err(e) => return Err(response_error(e, src)),
        };
        ensure!(len <= self.config.max_header_bytes(), Errno::HEADER_OVERFLOW);

        let minor = response.version.ok_or(Errno::INVALID_VERSION)?;
        let code = response.code.ok_or(Errno::INVALID_STATUS)?;
        let reason = match response.reason {
            Some(reason) if !reason.is_empty() => reason.as_bytes(),
            _ => raw_reason(src),
        };

        trace!(status = code, header_count = response.headers.len(), head_size = len, "parsed response head");
        self.status_code = Some(code);
        self.http_minor = Some(minor);

        ensure!(callbacks.on_message_begin().is_continue(), Errno::CB_MESSAGE_BEGIN);
        ensure!(callbacks.on_status(offset_in(data, reason), reason).is_continue(), Errno::CB_STATUS);
        emit_headers(callbacks, data, response.headers)?;

        let framing = Framing::for_response(code, response.headers)?;
        self.finish_head(callbacks, framing, len, offset)
    }

    fn partial_head(&mut self, seen: usize, end: usize, offset: &mut usize) -> Result<(), Errno> {
        ensure!(seen <= self.config.max_header_bytes(), Errno::HEADER_OVERFLOW);
        trace!(seen, "partial message head");
        self.state = State::HeadPartial;
        *offset = end;
        Ok(())
    }

    fn finish_head<C: Callbacks>(
        &mut self,
        callbacks: &mut C,
        framing: Framing,
        len: usize,
        offset: &mut usize,
    ) -> Result<(), Errno> {
        self.close = framing.closes_connection(self.http_minor.unwrap_or(1));
        ensure!(callbacks.on_headers_complete().is_continue(), Errno::CB_HEADERS_COMPLETE);
        *offset += len;

        let has_body = framing.body != BodyKind::Empty;
        self.start_body(framing.body);
        if !has_body {
            self.complete_message(callbacks)?;
        }
        Ok(())
    }
}

fn emit_headers<C: Callbacks>(callbacks: &mut C, data: &[u8], headers: &[httparse::Header<'_>]) -> Result<(), Errno> {
    for header in headers {
        let name = header.name.as_bytes();
        ensure!(callbacks.on_header_field(offset_in(data, name), name).is_continue(), Errno::CB_HEADER_FIELD);
        ensure!(callbacks.on_header_value(offset_in(data, header.value), header.value).is_continue(), Errno::CB_HEADER_VALUE);
    }
    Ok(())
}

/// Checks the request target form: authority form for CONNECT, otherwise origin form, `*` or
/// absolute form.
fn validate_target(method: u8, target: &str) -> Result<(), Errno> {
    if method == CONNECT {
        let (host, port) = target.rsplit_once(':').ok_or(Errno::INVALID_PORT)?;
        ensure!(!host.is_empty(), Errno::INVALID_HOST);
        ensure!(port.bytes().all(|b| b.is_ascii_digit()) && port.parse::<u16>().is_ok(), Errno::INVALID_PORT);
        return Ok(());
    }

    if target == "*" || target.starts_with('/') {
        return Ok(());
    }

    let (scheme, rest) = target.split_once("://").ok_or(Errno::INVALID_URL)?;
    ensure!(
        !scheme.is_empty() && scheme.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.')),
        Errno::INVALID_URL
    );
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    ensure!(!authority.is_empty(), Errno::INVALID_HOST);
    Ok(())
}

fn request_error(error: httparse::Error, method_seen: bool) -> Errno {
    match error {
        httparse::Error::HeaderName | httparse::Error::HeaderValue => Errno::INVALID_HEADER_TOKEN,
        httparse::Error::NewLine => Errno::LF_EXPECTED,
        httparse::Error::Status => Errno::INVALID_STATUS,
        httparse::Error::Token if method_seen => Errno::INVALID_URL,
        httparse::Error::Token => Errno::INVALID_METHOD,
        httparse::Error::TooManyHeaders => Errno::HEADER_OVERFLOW,
        httparse::Error::Version => Errno::INVALID_VERSION,
    }
}

fn response_error(error: httparse::Error, src: &[u8]) -> Errno {
    match error {
        httparse::Error::Version if !src.starts_with(b"HTTP/") => Errno::INVALID_CONSTANT,
        httparse::Error::Token => Errno::INVALID_STATUS,
        e => request_error(e, true),
    }
}

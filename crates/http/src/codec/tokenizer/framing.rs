//! Message body framing, following [RFC 9112 section 6.3](https://www.rfc-editor.org/rfc/rfc9112#section-6.3).

use super::Errno;
use crate::ensure;

/// How the body of the current message is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BodyKind {
    Empty,
    Length(u64),
    Chunked,
    /// Read until the peer closes the stream, responses only.
    UntilEof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Framing {
    pub(super) body: BodyKind,
    pub(super) close: bool,
    pub(super) keep_alive: bool,
}

/// The framing related header fields of one message.
#[derive(Debug, Default)]
struct Fields {
    content_length: Option<u64>,
    /// `Some(true)` when the final transfer coding is chunked.
    chunked: Option<bool>,
    close: bool,
    keep_alive: bool,
}

impl Fields {
    fn scan(headers: &[httparse::Header<'_>]) -> Result<Self, Errno> {
        let mut fields = Fields::default();
        for header in headers {
            if header.name.eq_ignore_ascii_case("content-length") {
                let length = parse_content_length(header.value)?;
                if let Some(previous) = fields.content_length {
                    ensure!(previous == length, Errno::UNEXPECTED_CONTENT_LENGTH);
                }
                fields.content_length = Some(length);
            } else if header.name.eq_ignore_ascii_case("transfer-encoding") {
                fields.chunked = Some(is_chunked(header.value));
            } else if header.name.eq_ignore_ascii_case("connection") {
                fields.close |= has_token(header.value, b"close");
                fields.keep_alive |= has_token(header.value, b"keep-alive");
            }
        }
        Ok(fields)
    }
}

impl Framing {
    pub(super) fn for_request(headers: &[httparse::Header<'_>]) -> Result<Self, Errno> {
        let fields = Fields::scan(headers)?;

        let body = match (fields.chunked, fields.content_length) {
            (Some(chunked), content_length) => {
                ensure!(chunked, Errno::STRICT);
                ensure!(content_length.is_none(), Errno::UNEXPECTED_CONTENT_LENGTH);
                BodyKind::Chunked
            }
            (None, Some(0) | None) => BodyKind::Empty,
            (None, Some(length)) => BodyKind::Length(length),
        };

        Ok(Self::with_body(body, &fields))
    }

    pub(super) fn for_response(status: u16, headers: &[httparse::Header<'_>]) -> Result<Self, Errno> {
        let fields = Fields::scan(headers)?;

        if matches!(status, 100..=199 | 204 | 304) {
            return Ok(Self::with_body(BodyKind::Empty, &fields));
        }

        let body = match (fields.chunked, fields.content_length) {
            (Some(true), Some(_)) => return Err(Errno::UNEXPECTED_CONTENT_LENGTH),
            (Some(true), None) => BodyKind::Chunked,
            (Some(false), _) | (None, None) => BodyKind::UntilEof,
            (None, Some(0)) => BodyKind::Empty,
            (None, Some(length)) => BodyKind::Length(length),
        };

        Ok(Self::with_body(body, &fields))
    }

    fn with_body(body: BodyKind, fields: &Fields) -> Self {
        Self { body, close: fields.close, keep_alive: fields.keep_alive }
    }

    /// Whether the connection ends after this message. HTTP/1.1 persists unless told to close;
    /// HTTP/1.0 closes unless the peer asked for keep-alive.
    pub(super) fn closes_connection(&self, http_minor: u8) -> bool {
        match http_minor {
            0 => self.close || !self.keep_alive,
            _ => self.close,
        }
    }
}

fn parse_content_length(value: &[u8]) -> Result<u64, Errno> {
    let value = value.trim_ascii();
    ensure!(!value.is_empty(), Errno::INVALID_CONTENT_LENGTH);

    value.iter().try_fold(0u64, |length, &b| {
        ensure!(b.is_ascii_digit(), Errno::INVALID_CONTENT_LENGTH);
        length.checked_mul(10).and_then(|length| length.checked_add(u64::from(b - b'0'))).ok_or(Errno::INVALID_CONTENT_LENGTH)
    })
}

/// Chunked must be the last coding when present, so only the final list item counts.
fn is_chunked(value: &[u8]) -> bool {
    value.rsplit(|b| *b == b',').next().is_some_and(|coding| coding.trim_ascii().eq_ignore_ascii_case(b"chunked"))
}

fn has_token(value: &[u8], token: &[u8]) -> bool {
    value.split(|b| *b == b',').any(|item| item.trim_ascii().eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(name: &'a str, value: &'a str) -> httparse::Header<'a> {
        httparse::Header { name, value: value.as_bytes() }
    }

    #[test]
    fn check_is_chunked() {
        assert!(is_chunked(b"chunked"));
        assert!(is_chunked(b"gzip, chunked"));
        assert!(is_chunked(b"gzip, Chunked "));
        assert!(!is_chunked(b"chunked, gzip"));
        assert!(!is_chunked(b"gzip"));
        assert!(!is_chunked(b""));
    }

    #[test]
    fn content_length_values() {
        assert_eq!(parse_content_length(b"13"), Ok(13));
        assert_eq!(parse_content_length(b" 0 "), Ok(0));
        assert_eq!(parse_content_length(b""), Err(Errno::INVALID_CONTENT_LENGTH));
        assert_eq!(parse_content_length(b"1a"), Err(Errno::INVALID_CONTENT_LENGTH));
        assert_eq!(parse_content_length(b"-1"), Err(Errno::INVALID_CONTENT_LENGTH));
        assert_eq!(parse_content_length(b"99999999999999999999999"), Err(Errno::INVALID_CONTENT_LENGTH));
    }

    #[test]
    fn request_framing() {
        let framing = Framing::for_request(&[header("Content-Length", "5")]).unwrap();
        assert_eq!(framing.body, BodyKind::Length(5));

        let framing = Framing::for_request(&[header("transfer-encoding", "chunked")]).unwrap();
        assert_eq!(framing.body, BodyKind::Chunked);

        let framing = Framing::for_request(&[header("Host", "a"), header("Connection", "keep-alive, close")]).unwrap();
        assert_eq!(framing, Framing { body: BodyKind::Empty, close: true, keep_alive: true });
    }

    #[test]
    fn connection_persistence() {
        let plain = Framing::for_request(&[header("Host", "a")]).unwrap();
        assert!(!plain.closes_connection(1));
        assert!(plain.closes_connection(0));

        let keep_alive = Framing::for_request(&[header("Connection", "Keep-Alive")]).unwrap();
        assert!(!keep_alive.closes_connection(0));
        assert!(!keep_alive.closes_connection(1));

        let close = Framing::for_response(200, &[header("Connection", "close"), header("Content-Length", "0")]).unwrap();
        assert!(close.closes_connection(0));
        assert!(close.closes_connection(1));
    }

    #[test]
    fn request_framing_conflicts() {
        let both = [header("Transfer-Encoding", "chunked"), header("Content-Length", "5")];
        assert_eq!(Framing::for_request(&both), Err(Errno::UNEXPECTED_CONTENT_LENGTH));

        let twice = [header("Content-Length", "5"), header("Content-Length", "6")];
        assert_eq!(Framing::for_request(&twice), Err(Errno::UNEXPECTED_CONTENT_LENGTH));

        let same = [header("Content-Length", "5"), header("content-length", "5")];
        assert_eq!(Framing::for_request(&same).map(|f| f.body), Ok(BodyKind::Length(5)));

        let gzip = [header("Transfer-Encoding", "gzip")];
        assert_eq!(Framing::for_request(&gzip), Err(Errno::STRICT));
    }

    #[test]
    fn response_framing() {
        assert_eq!(Framing::for_response(200, &[]).map(|f| f.body), Ok(BodyKind::UntilEof));
        assert_eq!(Framing::for_response(204, &[header("Content-Length", "5")]).map(|f| f.body), Ok(BodyKind::Empty));
        assert_eq!(Framing::for_response(304, &[]).map(|f| f.body), Ok(BodyKind::Empty));
        assert_eq!(Framing::for_response(101, &[]).map(|f| f.body), Ok(BodyKind::Empty));
        assert_eq!(Framing::for_response(200, &[header("Content-Length", "0")]).map(|f| f.body), Ok(BodyKind::Empty));
        assert_eq!(Framing::for_response(200, &[header("Transfer-Encoding", "gzip")]).map(|f| f.body), Ok(BodyKind::UntilEof));
        assert_eq!(
            Framing::for_response(200, &[header("Transfer-Encoding", "chunked"), header("Content-Length", "3")]),
            Err(Errno::UNEXPECTED_CONTENT_LENGTH)
        );
    }
}

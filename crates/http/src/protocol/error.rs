//! Error types for parsing and serializing HTTP/1.x messages.
//!
//! Parse failures carry a [`ParseErrorKind`], a stable semantic identity derived from the
//! tokenizer's numeric status code. Callers branch on the kind (or its numeric code), never on
//! the message text.

use std::io;

use thiserror::Error;

use crate::codec::tokenizer::Errno;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    #[error("send error: {source}")]
    Send {
        #[from]
        source: SendError,
    },
}

/// Semantic identity of a parse failure.
///
/// The discriminants are the tokenizer status codes, so `kind as u32` round-trips through
/// [`ParseErrorKind::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ParseErrorKind {
    CbMessageBegin = 1,
    CbUrl,
    CbHeaderField,
    CbHeaderValue,
    CbHeadersComplete,
    CbBody,
    CbMessageComplete,
    CbStatus,
    CbChunkHeader,
    CbChunkComplete,
    InvalidEofState,
    HeaderOverflow,
    ClosedConnection,
    InvalidVersion,
    InvalidStatus,
    InvalidMethod,
    InvalidUrl,
    InvalidHost,
    InvalidPort,
    InvalidPath,
    InvalidQueryString,
    InvalidFragment,
    LfExpected,
    InvalidHeaderToken,
    InvalidContentLength,
    UnexpectedContentLength,
    InvalidChunkSize,
    InvalidConstant,
    InvalidInternalState,
    Strict,
    Paused,
    Unknown,
}

struct Entry {
    kind: ParseErrorKind,
    identifier: &'static str,
    message: &'static str,
}

const fn entry(kind: ParseErrorKind, identifier: &'static str, message: &'static str) -> Entry {
    Entry { kind, identifier, message }
}

/// Lookup table indexed by `code - 1`.
static TAXONOMY: [Entry; 32] = {
    use ParseErrorKind::*;
    [
        entry(CbMessageBegin, "CB_message_begin", "the on_message_begin callback failed"),
        entry(CbUrl, "CB_url", "the on_url callback failed"),
        entry(CbHeaderField, "CB_header_field", "the on_header_field callback failed"),
        entry(CbHeaderValue, "CB_header_value", "the on_header_value callback failed"),
        entry(CbHeadersComplete, "CB_headers_complete", "the on_headers_complete callback failed"),
        entry(CbBody, "CB_body", "the on_body callback failed"),
        entry(CbMessageComplete, "CB_message_complete", "the on_message_complete callback failed"),
        entry(CbStatus, "CB_status", "the on_status callback failed"),
        entry(CbChunkHeader, "CB_chunk_header", "the on_chunk_header callback failed"),
        entry(CbChunkComplete, "CB_chunk_complete", "the on_chunk_complete callback failed"),
        entry(InvalidEofState, "INVALID_EOF_STATE", "stream ended at an unexpected time"),
        entry(HeaderOverflow, "HEADER_OVERFLOW", "too many header bytes seen; overflow detected"),
        entry(ClosedConnection, "CLOSED_CONNECTION", "data received after completed connection: close message"),
        entry(InvalidVersion, "INVALID_VERSION", "invalid HTTP version"),
        entry(InvalidStatus, "INVALID_STATUS", "invalid HTTP status code"),
        entry(InvalidMethod, "INVALID_METHOD", "invalid HTTP method"),
        entry(InvalidUrl, "INVALID_URL", "invalid URL"),
        entry(InvalidHost, "INVALID_HOST", "invalid host"),
        entry(InvalidPort, "INVALID_PORT", "invalid port"),
        entry(InvalidPath, "INVALID_PATH", "invalid path"),
        entry(InvalidQueryString, "INVALID_QUERY_STRING", "invalid query string"),
        entry(InvalidFragment, "INVALID_FRAGMENT", "invalid fragment"),
        entry(LfExpected, "LF_EXPECTED", "LF character expected"),
        entry(InvalidHeaderToken, "INVALID_HEADER_TOKEN", "invalid character in header"),
        entry(InvalidContentLength, "INVALID_CONTENT_LENGTH", "invalid character in content-length header"),
        entry(UnexpectedContentLength, "UNEXPECTED_CONTENT_LENGTH", "unexpected content-length header"),
        entry(InvalidChunkSize, "INVALID_CHUNK_SIZE", "invalid character in chunk size header"),
        entry(InvalidConstant, "INVALID_CONSTANT", "invalid constant string"),
        entry(InvalidInternalState, "INVALID_INTERNAL_STATE", "encountered unexpected internal state"),
        entry(Strict, "STRICT", "strict mode assertion failed"),
        entry(Paused, "PAUSED", "parser is paused"),
        entry(Unknown, "UNKNOWN", "an unknown error occurred"),
    ]
};

impl ParseErrorKind {
    /// Maps a raw tokenizer status code to its kind. Codes outside the table, including the
    /// success code `0`, map to [`ParseErrorKind::Unknown`].
    pub fn from_code(code: u32) -> Self {
        match TAXONOMY.get(code.wrapping_sub(1) as usize) {
            Some(entry) => entry.kind,
            None => ParseErrorKind::Unknown,
        }
    }

    pub fn from_errno(errno: Errno) -> Self {
        Self::from_code(errno.code())
    }

    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    fn entry(self) -> &'static Entry {
        &TAXONOMY[self as usize - 1]
    }

    /// Stable identifier, e.g. `"INVALID_EOF_STATE"`.
    pub fn identifier(self) -> &'static str {
        self.entry().identifier
    }

    pub fn message(self) -> &'static str {
        self.entry().message
    }

    /// Returns true if the failure came from a callback returning an abort status.
    pub fn is_callback_abort(self) -> bool {
        self.code() <= ParseErrorKind::CbChunkComplete.code()
    }
}

/// A parse failure, shaped like a system error code: a numeric value, a category name and a
/// human message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{}", .kind.message())]
pub struct ParseError {
    kind: ParseErrorKind,
}

impl ParseError {
    pub const CATEGORY: &'static str = "parse";

    pub fn new(kind: ParseErrorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn code(&self) -> u32 {
        self.kind.code()
    }

    pub fn category(&self) -> &'static str {
        Self::CATEGORY
    }

    pub fn identifier(&self) -> &'static str {
        self.kind.identifier()
    }

    pub fn invalid_method() -> Self {
        Self::new(ParseErrorKind::InvalidMethod)
    }
}

impl From<ParseErrorKind> for ParseError {
    #[inline]
    fn from(kind: ParseErrorKind) -> Self {
        Self { kind }
    }
}

impl From<Errno> for ParseError {
    #[inline]
    fn from(errno: Errno) -> Self {
        Self { kind: ParseErrorKind::from_errno(errno) }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("short write: {needed} bytes needed but only {available} available")]
    ShortWrite { needed: usize, available: usize },

    #[error("buffer capacity overflow: {requested} bytes requested")]
    CapacityOverflow { requested: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn short_write(needed: usize, available: usize) -> Self {
        Self::ShortWrite { needed, available }
    }

    pub fn capacity_overflow(requested: usize) -> Self {
        Self::CapacityOverflow { requested }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_code() {
        for (index, entry) in TAXONOMY.iter().enumerate() {
            assert_eq!(entry.kind.code() as usize, index + 1, "misplaced {}", entry.identifier);
            assert_eq!(ParseErrorKind::from_code(entry.kind.code()), entry.kind);
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(ParseErrorKind::from_code(0), ParseErrorKind::Unknown);
        assert_eq!(ParseErrorKind::from_code(33), ParseErrorKind::Unknown);
        assert_eq!(ParseErrorKind::from_code(u32::MAX), ParseErrorKind::Unknown);
        assert_eq!(ParseErrorKind::Unknown.message(), "an unknown error occurred");
    }

    #[test]
    fn eof_state_message() {
        let error = ParseError::new(ParseErrorKind::InvalidEofState);
        assert_eq!(error.to_string(), "stream ended at an unexpected time");
        assert_eq!(error.identifier(), "INVALID_EOF_STATE");
        assert_eq!(error.category(), "parse");
        assert_eq!(error.code(), 11);
    }

    #[test]
    fn errno_maps_to_kind() {
        assert_eq!(ParseError::from(Errno::INVALID_METHOD).kind(), ParseErrorKind::InvalidMethod);
        assert_eq!(ParseError::from(Errno::CB_BODY).kind(), ParseErrorKind::CbBody);
        assert_eq!(ParseError::from(Errno::OK).kind(), ParseErrorKind::Unknown);
    }

    #[test]
    fn callback_aborts_are_grouped() {
        assert!(ParseErrorKind::CbMessageBegin.is_callback_abort());
        assert!(ParseErrorKind::CbChunkComplete.is_callback_abort());
        assert!(!ParseErrorKind::InvalidEofState.is_callback_abort());
        assert!(!ParseErrorKind::Unknown.is_callback_abort());
    }

    #[test]
    fn http_error_wraps_both_sides() {
        let error: HttpError = ParseError::invalid_method().into();
        assert_eq!(error.to_string(), "parse error: invalid HTTP method");

        let error: HttpError = SendError::short_write(10, 4).into();
        assert_eq!(error.to_string(), "send error: short write: 10 bytes needed but only 4 available");
    }

    #[test]
    fn table_is_shareable() {
        fn assert_sync<T: Sync>(_: &T) {}
        assert_sync(&TAXONOMY);
        let handles: Vec<_> = (1..=32)
            .map(|code| std::thread::spawn(move || ParseErrorKind::from_code(code).identifier()))
            .collect();
        for handle in handles {
            assert!(!handle.join().unwrap().is_empty());
        }
    }
}

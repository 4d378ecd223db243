//! Callback-driven HTTP/1.x byte-grammar recognizer.
//!
//! The [`Tokenizer`] walks a byte buffer and reports structural events (request target, status
//! text, header fields and values, body data, chunk boundaries) to a [`Callbacks`]
//! implementation. Every event carries the offset and bytes of the region inside the buffer
//! that was passed to [`Tokenizer::execute`]; nothing is copied.
//!
//! # Contract
//!
//! - `execute(data)` advances over `data` and returns the number of bytes consumed. It stops
//!   after the first complete message, so pipelined bytes are left unconsumed.
//! - `execute(&[])` signals end of stream. A message that is still waiting for bytes at that
//!   point fails with [`Errno::INVALID_EOF_STATE`]; a response framed by connection close is
//!   completed.
//! - After a failure [`Tokenizer::errno`] holds the status code and further calls consume
//!   nothing.
//!
//! Start lines and header sections are recognized with `httparse` and must arrive within a
//! single `execute` call. Bodies may be split across calls.

mod chunked;
mod framing;
mod head;

use std::ops::ControlFlow;

use tracing::trace;

use crate::codec::ParseConfig;
use crate::ensure;

use chunked::ChunkedDecoder;
use framing::BodyKind;

/// Result of a callback: `Continue(())` to keep going, `Break(())` to abort the run.
pub type Flow = ControlFlow<()>;

/// Which start line the tokenizer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Request,
    Response,
}

/// Typed event sink for the tokenizer.
///
/// `at` is the offset of `data` inside the buffer given to the current `execute` call. A
/// header field event is always followed by its value event before the next field.
/// Breaking out of a callback fails the run with the matching `CB_*` status code.
pub trait Callbacks {
    fn on_message_begin(&mut self) -> Flow {
        Flow::Continue(())
    }

    fn on_url(&mut self, _at: usize, _data: &[u8]) -> Flow {
        Flow::Continue(())
    }

    fn on_status(&mut self, _at: usize, _data: &[u8]) -> Flow {
        Flow::Continue(())
    }

    fn on_header_field(&mut self, _at: usize, _data: &[u8]) -> Flow {
        Flow::Continue(())
    }

    fn on_header_value(&mut self, _at: usize, _data: &[u8]) -> Flow {
        Flow::Continue(())
    }

    fn on_headers_complete(&mut self) -> Flow {
        Flow::Continue(())
    }

    /// Decoded body bytes; chunk framing is never included.
    fn on_body(&mut self, _at: usize, _data: &[u8]) -> Flow {
        Flow::Continue(())
    }

    fn on_message_complete(&mut self) -> Flow {
        Flow::Continue(())
    }

    /// Size of the chunk about to be delivered, `0` for the last chunk.
    fn on_chunk_header(&mut self, _size: u64) -> Flow {
        Flow::Continue(())
    }

    fn on_chunk_complete(&mut self) -> Flow {
        Flow::Continue(())
    }
}

/// Tokenizer status code. `0` is success; every other value names a failure cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Errno(u32);

impl Errno {
    pub const OK: Errno = Errno(0);
    pub const CB_MESSAGE_BEGIN: Errno = Errno(1);
    pub const CB_URL: Errno = Errno(2);
    pub const CB_HEADER_FIELD: Errno = Errno(3);
    pub const CB_HEADER_VALUE: Errno = Errno(4);
    pub const CB_HEADERS_COMPLETE: Errno = Errno(5);
    pub const CB_BODY: Errno = Errno(6);
    pub const CB_MESSAGE_COMPLETE: Errno = Errno(7);
    pub const CB_STATUS: Errno = Errno(8);
    pub const CB_CHUNK_HEADER: Errno = Errno(9);
    pub const CB_CHUNK_COMPLETE: Errno = Errno(10);
    pub const INVALID_EOF_STATE: Errno = Errno(11);
    pub const HEADER_OVERFLOW: Errno = Errno(12);
    pub const CLOSED_CONNECTION: Errno = Errno(13);
    pub const INVALID_VERSION: Errno = Errno(14);
    pub const INVALID_STATUS: Errno = Errno(15);
    pub const INVALID_METHOD: Errno = Errno(16);
    pub const INVALID_URL: Errno = Errno(17);
    pub const INVALID_HOST: Errno = Errno(18);
    pub const INVALID_PORT: Errno = Errno(19);
    pub const INVALID_PATH: Errno = Errno(20);
    pub const INVALID_QUERY_STRING: Errno = Errno(21);
    pub const INVALID_FRAGMENT: Errno = Errno(22);
    pub const LF_EXPECTED: Errno = Errno(23);
    pub const INVALID_HEADER_TOKEN: Errno = Errno(24);
    pub const INVALID_CONTENT_LENGTH: Errno = Errno(25);
    pub const UNEXPECTED_CONTENT_LENGTH: Errno = Errno(26);
    pub const INVALID_CHUNK_SIZE: Errno = Errno(27);
    pub const INVALID_CONSTANT: Errno = Errno(28);
    pub const INVALID_INTERNAL_STATE: Errno = Errno(29);
    pub const STRICT: Errno = Errno(30);
    pub const PAUSED: Errno = Errno(31);
    pub const UNKNOWN: Errno = Errno(32);

    #[inline]
    pub const fn from_code(code: u32) -> Self {
        Errno(code)
    }

    #[inline]
    pub const fn code(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug)]
enum State {
    /// Waiting for the first byte of a message.
    Idle,
    /// A start line or header section was cut short; only end of stream may follow.
    HeadPartial,
    Body(BodyState),
    /// The previous message asked for the connection to be closed.
    Closed,
}

#[derive(Debug)]
enum BodyState {
    Length(u64),
    Chunked(ChunkedDecoder),
    UntilEof,
}

/// One-message-at-a-time HTTP/1.x recognizer. See the [module docs](self) for the contract.
#[derive(Debug)]
pub struct Tokenizer {
    mode: Mode,
    config: ParseConfig,
    state: State,
    errno: Errno,
    method: Option<u8>,
    status_code: Option<u16>,
    http_minor: Option<u8>,
    close: bool,
}

impl Tokenizer {
    pub fn new(mode: Mode) -> Self {
        Self::with_config(mode, ParseConfig::default())
    }

    pub fn with_config(mode: Mode, config: ParseConfig) -> Self {
        Self {
            mode,
            config,
            state: State::Idle,
            errno: Errno::OK,
            method: None,
            status_code: None,
            http_minor: None,
            close: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn errno(&self) -> Errno {
        self.errno
    }

    /// Method code of the last request line. Codes `0..=7` are DELETE, GET, HEAD, POST, PUT,
    /// CONNECT, OPTIONS and TRACE; higher codes are extension methods such as PATCH (`28`).
    pub fn method(&self) -> Option<u8> {
        self.method
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn http_minor(&self) -> Option<u8> {
        self.http_minor
    }

    /// Returns false once the last message ends the connection: `Connection: close`, or an
    /// HTTP/1.0 message without `Connection: keep-alive`.
    pub fn should_keep_alive(&self) -> bool {
        !self.close
    }

    /// Stops further progress until [`Tokenizer::resume`] is called.
    pub fn pause(&mut self) {
        if self.errno.is_ok() {
            self.errno = Errno::PAUSED;
        }
    }

    pub fn resume(&mut self) {
        if self.errno == Errno::PAUSED {
            self.errno = Errno::OK;
        }
    }

    /// Feeds `data`, or signals end of stream when `data` is empty. Returns the number of
    /// bytes consumed.
    pub fn execute<C: Callbacks>(&mut self, callbacks: &mut C, data: &[u8]) -> usize {
        if !self.errno.is_ok() {
            return 0;
        }

        let mut offset = 0;
        let result = if data.is_empty() { self.finish(callbacks) } else { self.run(callbacks, data, &mut offset) };

        if let Err(errno) = result {
            trace!(code = errno.code(), offset, "tokenizer failed");
            self.errno = errno;
        }
        offset
    }

    fn run<C: Callbacks>(&mut self, callbacks: &mut C, data: &[u8], offset: &mut usize) -> Result<(), Errno> {
        match self.state {
            State::Idle => self.read_head(callbacks, data, offset)?,
            State::HeadPartial => return Err(Errno::INVALID_INTERNAL_STATE),
            State::Closed => return Err(Errno::CLOSED_CONNECTION),
            State::Body(_) => {}
        }

        if matches!(self.state, State::Body(_)) {
            self.read_body(callbacks, data, offset)?;
        }
        Ok(())
    }

    fn read_body<C: Callbacks>(&mut self, callbacks: &mut C, data: &[u8], offset: &mut usize) -> Result<(), Errno> {
        let State::Body(body) = &mut self.state else {
            return Err(Errno::INVALID_INTERNAL_STATE);
        };

        let done = match body {
            BodyState::Length(remaining) => {
                let available = data.len() - *offset;
                let len = usize::try_from(*remaining).map_or(available, |remaining| remaining.min(available));
                if len > 0 {
                    ensure!(callbacks.on_body(*offset, &data[*offset..*offset + len]).is_continue(), Errno::CB_BODY);
                    *offset += len;
                    *remaining -= len as u64;
                }
                *remaining == 0
            }
            BodyState::Chunked(decoder) => decoder.decode(callbacks, data, offset)?,
            BodyState::UntilEof => {
                if *offset < data.len() {
                    ensure!(callbacks.on_body(*offset, &data[*offset..]).is_continue(), Errno::CB_BODY);
                    *offset = data.len();
                }
                false
            }
        };

        if done {
            self.complete_message(callbacks)?;
        }
        Ok(())
    }

    fn finish<C: Callbacks>(&mut self, callbacks: &mut C) -> Result<(), Errno> {
        match &self.state {
            State::Idle | State::Closed => Ok(()),
            State::Body(BodyState::UntilEof) => {
                self.close = true;
                self.complete_message(callbacks)
            }
            State::HeadPartial | State::Body(_) => Err(Errno::INVALID_EOF_STATE),
        }
    }

    fn complete_message<C: Callbacks>(&mut self, callbacks: &mut C) -> Result<(), Errno> {
        self.state = if self.close { State::Closed } else { State::Idle };
        ensure!(callbacks.on_message_complete().is_continue(), Errno::CB_MESSAGE_COMPLETE);
        Ok(())
    }

    fn start_body(&mut self, kind: BodyKind) {
        trace!(body = ?kind, "message framing");
        self.state = match kind {
            BodyKind::Empty => State::Idle,
            BodyKind::Length(len) => State::Body(BodyState::Length(len)),
            BodyKind::Chunked => State::Body(BodyState::Chunked(ChunkedDecoder::new())),
            BodyKind::UntilEof => State::Body(BodyState::UntilEof),
        };
    }
}

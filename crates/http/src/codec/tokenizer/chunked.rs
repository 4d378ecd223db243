//! Chunked transfer coding, as described in
//! [RFC 9112 section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1).
//!
//! The decoder walks the bytes handed to it by the tokenizer and reports each chunk's payload
//! through [`Callbacks::on_body`]; sizes, extensions, delimiters and trailers are consumed
//! silently. State survives between calls so a chunked body may be split anywhere.

use tracing::trace;

use super::{Callbacks, Errno};
use crate::ensure;
use ChunkedState::*;

#[derive(Debug)]
pub(super) struct ChunkedDecoder {
    state: ChunkedState,
    size: u64,
    has_digits: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Read the chunk size in hex
    Size,
    /// Whitespace after the size
    SizeLws,
    /// Skip chunk extensions
    Extension,
    SizeLf,
    Body,
    BodyCr,
    BodyLf,
    /// Skip one trailer field
    Trailer,
    TrailerLf,
    EndCr,
    EndLf,
    End,
}

impl ChunkedDecoder {
    pub(super) fn new() -> Self {
        Self { state: Size, size: 0, has_digits: false }
    }

    /// Advances over `data[*offset..]`. Returns `Ok(true)` once the last chunk and its
    /// trailer section have been read; bytes after that point are left untouched.
    pub(super) fn decode<C: Callbacks>(
        &mut self,
        callbacks: &mut C,
        data: &[u8],
        offset: &mut usize,
    ) -> Result<bool, Errno> {
        while self.state != End && *offset < data.len() {
            if self.state == Body {
                self.read_body(callbacks, data, offset)?;
                continue;
            }

            let b = data[*offset];
            *offset += 1;
            self.state = self.step(callbacks, b)?;
        }
        Ok(self.state == End)
    }

    fn read_body<C: Callbacks>(&mut self, callbacks: &mut C, data: &[u8], offset: &mut usize) -> Result<(), Errno> {
        let available = data.len() - *offset;
        let len = usize::try_from(self.size).map_or(available, |size| size.min(available));

        ensure!(callbacks.on_body(*offset, &data[*offset..*offset + len]).is_continue(), Errno::CB_BODY);
        *offset += len;
        self.size -= len as u64;

        if self.size == 0 {
            self.state = BodyCr;
        }
        Ok(())
    }

    fn step<C: Callbacks>(&mut self, callbacks: &mut C, b: u8) -> Result<ChunkedState, Errno> {
        match self.state {
            Size => self.read_size(b),
            SizeLws => match b {
                b'\t' | b' ' => Ok(SizeLws),
                b';' => Ok(Extension),
                b'\r' => Ok(SizeLf),
                _ => Err(Errno::INVALID_CHUNK_SIZE),
            },
            // extensions are not interpreted, they end at the next CRLF
            Extension => match b {
                b'\r' => Ok(SizeLf),
                b'\n' => Err(Errno::LF_EXPECTED),
                _ => Ok(Extension),
            },
            SizeLf => {
                ensure!(b == b'\n', Errno::LF_EXPECTED);
                self.start_chunk(callbacks)
            }
            BodyCr => {
                ensure!(b == b'\r', Errno::LF_EXPECTED);
                Ok(BodyLf)
            }
            BodyLf => {
                ensure!(b == b'\n', Errno::LF_EXPECTED);
                ensure!(callbacks.on_chunk_complete().is_continue(), Errno::CB_CHUNK_COMPLETE);
                self.size = 0;
                self.has_digits = false;
                Ok(Size)
            }
            Trailer => match b {
                b'\r' => Ok(TrailerLf),
                _ => Ok(Trailer),
            },
            TrailerLf => {
                ensure!(b == b'\n', Errno::LF_EXPECTED);
                Ok(EndCr)
            }
            EndCr => match b {
                b'\r' => Ok(EndLf),
                _ => Ok(Trailer),
            },
            EndLf => {
                ensure!(b == b'\n', Errno::LF_EXPECTED);
                trace!("finished reading chunked data");
                ensure!(callbacks.on_chunk_complete().is_continue(), Errno::CB_CHUNK_COMPLETE);
                Ok(End)
            }
            Body | End => Err(Errno::INVALID_INTERNAL_STATE),
        }
    }

    fn read_size(&mut self, b: u8) -> Result<ChunkedState, Errno> {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b + 10 - b'a',
            b'A'..=b'F' => b + 10 - b'A',
            b'\t' | b' ' | b';' | b'\r' => {
                ensure!(self.has_digits, Errno::INVALID_CHUNK_SIZE);
                return Ok(match b {
                    b';' => Extension,
                    b'\r' => SizeLf,
                    _ => SizeLws,
                });
            }
            _ => return Err(Errno::INVALID_CHUNK_SIZE),
        };

        self.size = self
            .size
            .checked_mul(16)
            .and_then(|size| size.checked_add(u64::from(digit)))
            .ok_or(Errno::INVALID_CHUNK_SIZE)?;
        self.has_digits = true;
        Ok(Size)
    }

    fn start_chunk<C: Callbacks>(&mut self, callbacks: &mut C) -> Result<ChunkedState, Errno> {
        trace!(size = self.size, "chunk size");
        ensure!(callbacks.on_chunk_header(self.size).is_continue(), Errno::CB_CHUNK_HEADER);
        Ok(if self.size == 0 { EndCr } else { Body })
    }
}

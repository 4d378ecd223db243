//! Byte destinations for serialized messages.
//!
//! The serializer reserves the full wire size of a message before writing anything, so a sink
//! either accepts the whole message or rejects it untouched.

use bytes::{BufMut, BytesMut};
use tracing::error;

use crate::protocol::SendError;

/// Smallest capacity a [`GrowableSink`] allocates.
const MIN_CAPACITY: usize = 64;

/// Largest capacity any allocation may have.
const MAX_CAPACITY: usize = isize::MAX as usize;

/// A destination for wire bytes.
pub trait WireSink {
    /// Makes room for `additional` more bytes, or fails without writing anything.
    fn reserve_bytes(&mut self, additional: usize) -> Result<(), SendError>;

    /// Appends `bytes`. Callers reserve first; writing past a reservation may fail.
    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SendError>;
}

fn required_capacity(len: usize, additional: usize) -> Result<usize, SendError> {
    match len.checked_add(additional) {
        Some(required) if required <= MAX_CAPACITY => Ok(required),
        _ => {
            error!(len, additional, "sink capacity overflow");
            Err(SendError::capacity_overflow(additional))
        }
    }
}

/// A heap buffer that grows by doubling, starting at 64 bytes.
#[derive(Debug, Default)]
pub struct GrowableSink {
    buf: BytesMut,
}

impl GrowableSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> BytesMut {
        self.buf
    }
}

impl WireSink for GrowableSink {
    fn reserve_bytes(&mut self, additional: usize) -> Result<(), SendError> {
        let required = required_capacity(self.buf.len(), additional)?;
        if required <= self.buf.capacity() {
            return Ok(());
        }

        let mut capacity = self.buf.capacity().max(MIN_CAPACITY);
        while capacity < required {
            capacity = capacity.saturating_mul(2).min(MAX_CAPACITY);
        }
        self.buf.reserve(capacity - self.buf.len());
        Ok(())
    }

    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        self.reserve_bytes(bytes.len())?;
        self.buf.put_slice(bytes);
        Ok(())
    }
}

/// A caller-provided buffer of fixed size.
#[derive(Debug)]
pub struct FixedSink<'a> {
    buf: &'a mut [u8],
    written: usize,
}

impl<'a> FixedSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, written: 0 }
    }

    /// Number of bytes written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.written
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.written]
    }
}

impl WireSink for FixedSink<'_> {
    fn reserve_bytes(&mut self, additional: usize) -> Result<(), SendError> {
        let available = self.remaining();
        if additional > available {
            return Err(SendError::short_write(additional, available));
        }
        Ok(())
    }

    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        self.reserve_bytes(bytes.len())?;
        let end = self.written + bytes.len();
        self.buf[self.written..end].copy_from_slice(bytes);
        self.written = end;
        Ok(())
    }
}

impl WireSink for Vec<u8> {
    fn reserve_bytes(&mut self, additional: usize) -> Result<(), SendError> {
        required_capacity(self.len(), additional)?;
        self.try_reserve(additional).map_err(|e| {
            error!(additional, cause = %e, "vec sink reservation failed");
            SendError::capacity_overflow(additional)
        })
    }

    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl WireSink for BytesMut {
    fn reserve_bytes(&mut self, additional: usize) -> Result<(), SendError> {
        required_capacity(self.len(), additional)?;
        self.reserve(additional);
        Ok(())
    }

    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        self.put_slice(bytes);
        Ok(())
    }
}

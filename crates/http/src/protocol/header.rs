//! Header fields as they appeared on the wire.
//!
//! Names keep their original case and duplicates are separate entries, so a
//! [`HeaderContainer`] reproduces the header section exactly when serialized.

use std::str::Utf8Error;

use bytes::Bytes;

/// A single `name: value` header field with owned storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    name: Bytes,
    value: Bytes,
}

/// Header fields in wire arrival order.
pub type HeaderContainer = Vec<Header>;

impl Header {
    pub fn new(name: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    /// Copies both parts out of a borrowed buffer.
    pub fn copy_from_slices(name: &[u8], value: &[u8]) -> Self {
        Self { name: Bytes::copy_from_slice(name), value: Bytes::copy_from_slice(value) }
    }

    #[inline]
    pub fn name(&self) -> &Bytes {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    pub fn name_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.name)
    }

    pub fn value_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.value)
    }

    pub fn into_parts(self) -> (Bytes, Bytes) {
        (self.name, self.value)
    }

    /// Number of bytes this header occupies on the wire, `name: value\r\n`.
    pub(crate) fn wire_len(&self) -> usize {
        self.name.len() + 2 + self.value.len() + 2
    }
}

impl<N, V> From<(N, V)> for Header
where
    N: Into<Bytes>,
    V: Into<Bytes>,
{
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

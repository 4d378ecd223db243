//! Zero-copy recording of tokenizer events.
//!
//! An [`EventCollector`] lives for exactly one parse call. It stores [`Slice`]s, byte ranges
//! into the caller's buffer, and defers every copy to materialization.

use std::ops::Range;

use crate::codec::tokenizer::{Callbacks, Flow};

/// A `(start, end)` view into the buffer of the current parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    start: usize,
    end: usize,
}

impl Slice {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Resolves the view against the buffer it was recorded from.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than `end`.
    #[inline]
    pub fn get<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.range()]
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    fn of(at: usize, data: &[u8]) -> Self {
        Self::new(at, at + data.len())
    }
}

/// Accumulates the target, header pairs and body pieces of one message.
#[derive(Debug, Default)]
pub struct EventCollector {
    target: Slice,
    headers: Vec<(Slice, Slice)>,
    body: Vec<Slice>,
    complete: bool,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The request path or the response status text.
    pub fn target(&self) -> Slice {
        self.target
    }

    pub fn headers(&self) -> &[(Slice, Slice)] {
        &self.headers
    }

    pub fn body(&self) -> &[Slice] {
        &self.body
    }

    pub fn body_len(&self) -> usize {
        self.body.iter().map(Slice::len).sum()
    }

    /// Returns true once the tokenizer has reported the end of a message.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl Callbacks for EventCollector {
    fn on_url(&mut self, at: usize, data: &[u8]) -> Flow {
        self.target = Slice::of(at, data);
        Flow::Continue(())
    }

    fn on_status(&mut self, at: usize, data: &[u8]) -> Flow {
        self.target = Slice::of(at, data);
        Flow::Continue(())
    }

    fn on_header_field(&mut self, at: usize, data: &[u8]) -> Flow {
        self.headers.push((Slice::of(at, data), Slice::default()));
        Flow::Continue(())
    }

    fn on_header_value(&mut self, at: usize, data: &[u8]) -> Flow {
        // the tokenizer always reports a field before its value
        if let Some((_, value)) = self.headers.last_mut() {
            *value = Slice::of(at, data);
        }
        Flow::Continue(())
    }

    fn on_body(&mut self, at: usize, data: &[u8]) -> Flow {
        self.body.push(Slice::of(at, data));
        Flow::Continue(())
    }

    fn on_message_complete(&mut self) -> Flow {
        self.complete = true;
        Flow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tokenizer::{Errno, Mode, Tokenizer};

    #[test]
    fn slice_views() {
        let buf = b"hello world";
        let slice = Slice::new(6, 11);
        assert_eq!(slice.get(buf), b"world");
        assert_eq!(slice.len(), 5);
        assert!(!slice.is_empty());
        assert!(Slice::default().is_empty());
        assert_eq!(Slice::default().get(buf), b"");
    }

    #[test]
    fn pairs_fields_with_values() {
        let mut collector = EventCollector::new();
        let buf = b"Host: a";
        let _ = collector.on_header_field(0, &buf[0..4]);
        let _ = collector.on_header_value(6, &buf[6..7]);

        let (name, value) = collector.headers()[0];
        assert_eq!(name.get(buf), b"Host");
        assert_eq!(value.get(buf), b"a");
    }

    #[test]
    fn collects_chunked_body_pieces() {
        let buf = b"POST /p HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n2\r\nab\r\n3\r\ncde\r\n0\r\n\r\n";
        let mut tokenizer = Tokenizer::new(Mode::Request);
        let mut collector = EventCollector::new();
        assert_eq!(tokenizer.execute(&mut collector, buf), buf.len());
        assert_eq!(tokenizer.errno(), Errno::OK);

        assert_eq!(collector.target().get(buf), b"/p");
        assert_eq!(collector.headers().len(), 1);
        let pieces: Vec<_> = collector.body().iter().map(|s| s.get(buf)).collect();
        assert_eq!(pieces, [&b"ab"[..], &b"cde"[..]]);
        assert_eq!(collector.body_len(), 5);
        assert!(collector.is_complete());
    }
}

/// Default upper bound on the size of a start line plus header section.
const MAX_HEADER_BYTES: usize = 80 * 1024;

/// Default upper bound on the number of header fields.
const MAX_HEADER_NUM: usize = 64;

/// Limits applied while recognizing a message head. Exceeding either one fails the parse with
/// `HEADER_OVERFLOW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    max_header_bytes: usize,
    max_headers: usize,
}

impl ParseConfig {
    pub const fn new() -> Self {
        Self { max_header_bytes: MAX_HEADER_BYTES, max_headers: MAX_HEADER_NUM }
    }

    #[must_use]
    pub const fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    #[must_use]
    pub const fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    #[inline]
    pub const fn max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }

    #[inline]
    pub const fn max_headers(&self) -> usize {
        self.max_headers
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ParseConfig::default();
        assert_eq!(config.max_header_bytes(), 80 * 1024);
        assert_eq!(config.max_headers(), 64);
    }

    #[test]
    fn setters_chain() {
        let config = ParseConfig::new().with_max_headers(8).with_max_header_bytes(512);
        assert_eq!(config.max_headers(), 8);
        assert_eq!(config.max_header_bytes(), 512);
        assert_ne!(config, ParseConfig::default());
    }
}

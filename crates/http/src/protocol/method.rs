use std::fmt;

/// The request methods a parsed or built [`HttpRequest`](crate::protocol::HttpRequest) may
/// carry.
///
/// Discriminants match the tokenizer's method codes, so [`Method::from_code`] accepts exactly
/// the codes `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Method {
    Delete = 0,
    Get,
    Head,
    Post,
    Put,
    Connect,
    Options,
    Trace,
}

impl Method {
    pub const ALL: [Method; 8] = [
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Connect,
        Method::Options,
        Method::Trace,
    ];

    /// Returns `None` for codes outside the known set, including extension methods the
    /// tokenizer recognizes but this model does not represent.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Delete => http::Method::DELETE,
            Method::Get => http::Method::GET,
            Method::Head => http::Method::HEAD,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Connect => http::Method::CONNECT,
            Method::Options => http::Method::OPTIONS,
            Method::Trace => http::Method::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for method in Method::ALL {
            assert_eq!(Method::from_code(method.code()), Some(method));
        }
    }

    #[test]
    fn out_of_range_code() {
        assert_eq!(Method::from_code(8), None);
        // PATCH in the tokenizer's table
        assert_eq!(Method::from_code(28), None);
        assert_eq!(Method::from_code(u8::MAX), None);
    }

    #[test]
    fn into_http_method() {
        assert_eq!(http::Method::from(Method::Options), http::Method::OPTIONS);
        assert_eq!(http::Method::from(Method::Get).as_str(), Method::Get.as_str());
    }
}

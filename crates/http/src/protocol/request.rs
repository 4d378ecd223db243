//! Immutable HTTP request messages and their builders.
//!
//! A request is assembled in a fixed order: request line, then headers, then an optional body.
//! Every builder step takes the builder by value, so a builder cannot be reused once
//! [`RequestHeaderBuilder::build`] has consumed it.

use bytes::Bytes;

use crate::protocol::{Header, HeaderContainer, Method, Version};

/// The request line: `METHOD path HTTP/1.x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestLine {
    pub method: Method,
    pub path: String,
    pub version: Version,
}

impl RequestLine {
    pub fn new(method: Method, path: impl Into<String>, version: Version) -> Self {
        Self { method, path: path.into(), version }
    }
}

/// An HTTP/1.x request with owned header and body storage.
///
/// There is no way to mutate a request after it has been built; use
/// [`HttpRequest::into_parts`] and a new builder to derive a modified copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    line: RequestLine,
    headers: HeaderContainer,
    body: Bytes,
}

impl HttpRequest {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn method(&self) -> Method {
        self.line.method
    }

    pub fn path(&self) -> &str {
        &self.line.path
    }

    pub fn version(&self) -> Version {
        self.line.version
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.line
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (RequestLine, HeaderContainer, Bytes) {
        (self.line, self.headers, self.body)
    }
}

/// Entry point of the request builder chain.
#[derive(Debug, Default)]
#[must_use]
pub struct RequestBuilder {
    _priv: (),
}

impl RequestBuilder {
    pub fn with_protocol(self, line: RequestLine) -> RequestHeaderBuilder {
        RequestHeaderBuilder { line, headers: HeaderContainer::new() }
    }
}

/// Collects headers for a request; consumed by `build`.
#[derive(Debug)]
#[must_use]
pub struct RequestHeaderBuilder {
    line: RequestLine,
    headers: HeaderContainer,
}

impl RequestHeaderBuilder {
    /// Appends one header. Headers with the same name are kept as separate entries.
    pub fn with_header(mut self, header: impl Into<Header>) -> Self {
        self.headers.push(header.into());
        self
    }

    /// Appends headers in iteration order.
    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Header>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    /// Appends an already collected container, reusing its allocation when nothing has been
    /// added yet.
    pub fn with_header_container(mut self, headers: HeaderContainer) -> Self {
        if self.headers.is_empty() {
            self.headers = headers;
        } else {
            self.headers.extend(headers);
        }
        self
    }

    /// Builds a request with an empty body.
    pub fn build(self) -> HttpRequest {
        self.build_with_body(Bytes::new())
    }

    pub fn build_with_body(self, body: impl Into<Bytes>) -> HttpRequest {
        HttpRequest { line: self.line, headers: self.headers, body: body.into() }
    }
}

impl TryFrom<&HttpRequest> for http::Request<Bytes> {
    type Error = http::Error;

    fn try_from(request: &HttpRequest) -> Result<Self, Self::Error> {
        let mut builder = http::Request::builder()
            .method(http::Method::from(request.method()))
            .uri(request.path())
            .version(request.version().into());

        for header in request.headers() {
            builder = builder.header(&header.name()[..], &header.value()[..]);
        }

        builder.body(request.body().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_index() -> RequestHeaderBuilder {
        HttpRequest::builder().with_protocol(RequestLine::new(Method::Get, "/index", Version::Http11))
    }

    #[test]
    fn build_without_body() {
        let request = get_index().with_header(("Host", "example.com")).build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.path(), "/index");
        assert_eq!(request.version(), Version::Http11);
        assert_eq!(request.headers(), &[Header::new("Host", "example.com")]);
        assert!(request.body().is_empty());
    }

    #[test]
    fn headers_append_in_order() {
        let request = get_index()
            .with_header(("Accept", "text/html"))
            .with_headers([("Accept", "application/json"), ("Host", "a")])
            .with_header(("accept", "*/*"))
            .build();

        let names: Vec<_> = request.headers().iter().map(|h| h.name_str().unwrap()).collect();
        assert_eq!(names, ["Accept", "Accept", "Host", "accept"]);
        assert_eq!(request.headers()[1].value(), "application/json");
    }

    #[test]
    fn header_container_keeps_existing() {
        let request = get_index()
            .with_header(("Host", "a"))
            .with_header_container(vec![Header::new("Accept", "*/*")])
            .build();
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.headers()[0].name(), "Host");
    }

    #[test]
    fn build_with_body() {
        let request = HttpRequest::builder()
            .with_protocol(RequestLine::new(Method::Post, "/submit", Version::Http10))
            .with_header(("Content-Length", "5"))
            .build_with_body(&b"hello"[..]);

        assert_eq!(request.body(), &b"hello"[..]);
        let copy = request.clone();
        assert_eq!(copy, request);
    }

    #[test]
    fn into_http_request() {
        let request = get_index()
            .with_header(("Host", "example.com"))
            .with_header(("Accept", "a"))
            .with_header(("Accept", "b"))
            .build();

        let converted = http::Request::<Bytes>::try_from(&request).unwrap();
        assert_eq!(converted.method(), http::Method::GET);
        assert_eq!(converted.uri().path(), "/index");
        assert_eq!(converted.version(), http::Version::HTTP_11);
        let accepts: Vec<_> = converted.headers().get_all(http::header::ACCEPT).iter().collect();
        assert_eq!(accepts, ["a", "b"]);
    }
}

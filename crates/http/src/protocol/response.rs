//! Immutable HTTP response messages and their builders.
//!
//! Mirrors [`request`](super::request): status line first, then headers, then an optional
//! body, with each step consuming the builder.

use bytes::Bytes;

use crate::protocol::{Header, HeaderContainer, Version};

/// The status line: `HTTP/1.x code text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusLine {
    pub version: Version,
    pub status_code: u16,
    pub status_text: String,
}

impl StatusLine {
    pub fn new(version: Version, status_code: u16, status_text: impl Into<String>) -> Self {
        Self { version, status_code, status_text: status_text.into() }
    }
}

/// An HTTP/1.x response with owned header and body storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    line: StatusLine,
    headers: HeaderContainer,
    body: Bytes,
}

impl HttpResponse {
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }

    pub fn version(&self) -> Version {
        self.line.version
    }

    pub fn status_code(&self) -> u16 {
        self.line.status_code
    }

    pub fn status_text(&self) -> &str {
        &self.line.status_text
    }

    pub fn status_line(&self) -> &StatusLine {
        &self.line
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (StatusLine, HeaderContainer, Bytes) {
        (self.line, self.headers, self.body)
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct ResponseBuilder {
    _priv: (),
}

impl ResponseBuilder {
    pub fn with_protocol(self, line: StatusLine) -> ResponseHeaderBuilder {
        ResponseHeaderBuilder { line, headers: HeaderContainer::new() }
    }
}

#[derive(Debug)]
#[must_use]
pub struct ResponseHeaderBuilder {
    line: StatusLine,
    headers: HeaderContainer,
}

impl ResponseHeaderBuilder {
    pub fn with_header(mut self, header: impl Into<Header>) -> Self {
        self.headers.push(header.into());
        self
    }

    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Header>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    pub fn with_header_container(mut self, headers: HeaderContainer) -> Self {
        if self.headers.is_empty() {
            self.headers = headers;
        } else {
            self.headers.extend(headers);
        }
        self
    }

    pub fn build(self) -> HttpResponse {
        self.build_with_body(Bytes::new())
    }

    pub fn build_with_body(self, body: impl Into<Bytes>) -> HttpResponse {
        HttpResponse { line: self.line, headers: self.headers, body: body.into() }
    }
}

impl TryFrom<&HttpResponse> for http::Response<Bytes> {
    type Error = http::Error;

    fn try_from(response: &HttpResponse) -> Result<Self, Self::Error> {
        let mut builder =
            http::Response::builder().status(response.status_code()).version(response.version().into());

        for header in response.headers() {
            builder = builder.header(&header.name()[..], &header.value()[..]);
        }

        builder.body(response.body().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_with_body() {
        let response = HttpResponse::builder()
            .with_protocol(StatusLine::new(Version::Http11, 200, "OK"))
            .with_headers([("Server", "MyTestServer"), ("Content-Length", "13")])
            .with_header(("Content-Type", "text/plain"))
            .build_with_body("Hello, World!");

        assert_eq!(response.version(), Version::Http11);
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.status_text(), "OK");
        assert_eq!(response.headers().len(), 3);
        assert_eq!(response.headers()[2].name(), "Content-Type");
        assert_eq!(response.body(), "Hello, World!");
    }

    #[test]
    fn duplicate_names_are_kept() {
        let response = HttpResponse::builder()
            .with_protocol(StatusLine::new(Version::Http10, 302, "Found"))
            .with_header(("Set-Cookie", "a=1"))
            .with_header(("Set-Cookie", "b=2"))
            .build();

        assert_eq!(response.headers()[0], Header::new("Set-Cookie", "a=1"));
        assert_eq!(response.headers()[1], Header::new("Set-Cookie", "b=2"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn into_http_response() {
        let response = HttpResponse::builder()
            .with_protocol(StatusLine::new(Version::Http11, 404, "Not Found"))
            .with_header(("Content-Length", "0"))
            .build();

        let converted = http::Response::<Bytes>::try_from(&response).unwrap();
        assert_eq!(converted.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(converted.headers()[http::header::CONTENT_LENGTH], "0");
    }

    #[test]
    fn into_http_response_rejects_bad_status() {
        let response = HttpResponse::builder().with_protocol(StatusLine::new(Version::Http11, 1000, "Odd")).build();
        assert!(http::Response::<Bytes>::try_from(&response).is_err());
    }
}

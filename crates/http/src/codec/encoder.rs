//! [`Encoder`] adapters so built messages can be written through a `tokio_util` framed sink.

use bytes::BytesMut;
use tokio_util::codec::Encoder;

use crate::codec::serialize::{write_request, write_response};
use crate::protocol::{HttpRequest, HttpResponse, SendError};

#[derive(Debug, Default, Clone, Copy)]
pub struct RequestEncoder;

impl RequestEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<&HttpRequest> for RequestEncoder {
    type Error = SendError;

    fn encode(&mut self, item: &HttpRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write_request(item, dst).map(|_| ())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<&HttpResponse> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: &HttpResponse, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write_response(item, dst).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_response;
    use crate::protocol::{Method, RequestLine, StatusLine, Version};

    #[test]
    fn encode_appends_to_buffer() {
        let first = HttpRequest::builder().with_protocol(RequestLine::new(Method::Get, "/a", Version::Http11)).build();
        let second = HttpRequest::builder()
            .with_protocol(RequestLine::new(Method::Head, "/b", Version::Http11))
            .with_header(("Host", "example.com"))
            .build();

        let mut encoder = RequestEncoder::new();
        let mut dst = BytesMut::new();
        encoder.encode(&first, &mut dst).unwrap();
        encoder.encode(&second, &mut dst).unwrap();

        assert_eq!(&dst[..], b"GET /a HTTP/1.1\r\n\r\nHEAD /b HTTP/1.1\r\nHost: example.com\r\n\r\n");
    }

    #[test]
    fn encoded_response_parses_back() {
        let response = HttpResponse::builder()
            .with_protocol(StatusLine::new(Version::Http11, 404, "Not Found"))
            .with_header(("Content-Length", "7"))
            .build_with_body("missing");

        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(&response, &mut dst).unwrap();

        let (parsed, _) = parse_response(&dst).unwrap();
        assert_eq!(parsed, response);
    }
}

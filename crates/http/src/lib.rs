//! Parsing and serializing HTTP/1.x messages.
//!
//! This crate turns a callback driven HTTP/1.x tokenizer into typed, immutable request and
//! response values, and renders those values back to wire bytes. Parse failures carry a stable
//! identity from a fixed error taxonomy instead of free-form text.
//!
//! # Features
//!
//! - One-shot parsing of a buffered request or response, including chunked bodies
//! - Zero-copy event collection, a single copy at materialization
//! - Immutable messages built by single-use, consuming builders
//! - Serialization into growable or fixed size buffers, or through a `tokio_util` encoder
//! - Logging through `tracing`
//!
//! # Example
//!
//! ```
//! use micro_http_message::codec::{parse_request, parse_response};
//! use micro_http_message::protocol::{HttpResponse, Method, ParseErrorKind, StatusLine, Version};
//!
//! let (request, _) = parse_request(b"GET /index HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! assert_eq!(request.method(), Method::Get);
//! assert_eq!(request.headers()[0].value(), "example.com");
//!
//! let response = HttpResponse::builder()
//!     .with_protocol(StatusLine::new(Version::Http11, 200, "OK"))
//!     .with_header(("Content-Length", "13"))
//!     .build_with_body("Hello, World!");
//! let wire = response.to_bytes().unwrap();
//! let (parsed, _) = parse_response(&wire).unwrap();
//! assert_eq!(parsed, response);
//!
//! let error = parse_request(b"GET /index HTTP/1.1\r\nHost: exa").unwrap_err();
//! assert_eq!(error.kind(), ParseErrorKind::InvalidEofState);
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: message model, builders and error types
//! - [`codec`]: tokenizer, event collection, parsing and serialization

pub mod codec;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;

//! HTTP/1.x message model.
//!
//! Messages are immutable once built:
//!
//! - [`HttpRequest`] / [`HttpResponse`]: start line, ordered headers and a fully reassembled body
//! - [`RequestHeaderBuilder`] / [`ResponseHeaderBuilder`]: single-use builders producing them
//! - [`Header`] / [`HeaderContainer`]: case-preserving, never merged header fields
//! - [`error`]: the parse error taxonomy and serialization errors
//!
//! # Example
//!
//! ```
//! use micro_http_message::protocol::{HttpResponse, StatusLine, Version};
//!
//! let response = HttpResponse::builder()
//!     .with_protocol(StatusLine::new(Version::Http11, 200, "OK"))
//!     .with_header(("Content-Length", "2"))
//!     .build_with_body("ok");
//!
//! assert_eq!(response.status_code(), 200);
//! assert_eq!(response.body(), "ok");
//! ```

mod header;
pub use header::Header;
pub use header::HeaderContainer;

mod method;
pub use method::Method;

mod version;
pub use version::Version;

mod request;
pub use request::HttpRequest;
pub use request::RequestBuilder;
pub use request::RequestHeaderBuilder;
pub use request::RequestLine;

mod response;
pub use response::HttpResponse;
pub use response::ResponseBuilder;
pub use response::ResponseHeaderBuilder;
pub use response::StatusLine;

pub mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::ParseErrorKind;
pub use error::SendError;

/// The reassembled message body.
pub type BodyContainer = bytes::Bytes;

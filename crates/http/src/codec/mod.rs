//! HTTP/1.x message codec.
//!
//! This module connects raw bytes and the message model in [`crate::protocol`]:
//!
//! - Parsing:
//!   - [`tokenizer`]: callback driven byte grammar recognizer
//!   - [`EventCollector`]: records tokenizer events as [`Slice`]s into the input buffer
//!   - [`parse_request`] / [`parse_response`]: one-shot parsing into owned messages
//!
//! - Serializing:
//!   - [`write_request`] / [`write_response`]: render a message into any [`WireSink`]
//!   - [`GrowableSink`], [`FixedSink`]: growable and fixed size destinations
//!   - [`RequestEncoder`] / [`ResponseEncoder`]: `tokio_util` encoders over the same path
//!
//! # Example
//!
//! ```
//! use micro_http_message::codec::{parse_response, write_response, GrowableSink};
//!
//! let input = b"HTTP/1.1 200 OK\r\nServer: example.com\r\nContent-Length: 0\r\n\r\n";
//! let (response, consumed) = parse_response(input).unwrap();
//! assert_eq!(consumed, input.len());
//!
//! let mut sink = GrowableSink::new();
//! write_response(&response, &mut sink).unwrap();
//! assert_eq!(sink.as_bytes(), input);
//! ```

mod collector;
mod config;
mod encoder;
mod parse;
mod serialize;
mod sink;
pub mod tokenizer;

pub use collector::{EventCollector, Slice};
pub use config::ParseConfig;
pub use encoder::{RequestEncoder, ResponseEncoder};
pub use parse::{parse_request, parse_request_with, parse_response, parse_response_with};
pub use serialize::{write_request, write_response};
pub use sink::{FixedSink, GrowableSink, WireSink};

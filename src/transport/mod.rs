//! HTTP transport to the Ollama server and the NDJSON stream decoder.

pub mod http;
pub mod ndjson;

pub use http::{HttpTransport, TransportError};
pub use ndjson::decode_ndjson;

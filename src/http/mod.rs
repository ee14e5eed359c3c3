//! HTTP protocol implementation.
//!
//! One request per connection, no keep-alive, no chunked bodies.
//!
//! # Architecture
//!
//! - **`reader`**: Deadline-bounded buffered reads (`read_until`, `read_exactly`)
//! - **`parser`**: Reads the head, validates it, then reads the body by Content-Length
//! - **`request`**: HTTP request representation and header helpers
//! - **`response`**: Status codes and the response builder
//! - **`encoding`**: Accept-Encoding negotiation and gzip
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`connection`**: Drives a single connection from accept to close
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← head, then body, under one deadline
//!        └──────┬──────┘
//!               │ Request parsed        ── parse error → Writing (400 / 408)
//!               ▼                       ── peer gone   → Closed
//!        ┌──────────────────┐
//!        │   Processing     │ ← Router picks the response
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod encoding;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;

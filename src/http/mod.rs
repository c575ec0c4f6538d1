//! HTTP request framing.
//!
//! This module recognizes where one HTTP-style request ends inside a raw byte
//! stream and answers it with a fixed response. Only the header terminator and
//! the `Content-Length` field are interpreted; everything else is discarded.
//!
//! # Architecture
//!
//! - **`ring`**: fixed-capacity circular byte buffer holding unread bytes
//! - **`parser`**: header terminator scan and `Content-Length` extraction, both
//!   done in place over the ring
//! - **`framer`**: the two-state request framer owning the ring
//! - **`connection`**: reads chunks from a stream, drives the framer, responds
//! - **`writer`**: writes the canned response to the client
//!
//! # Framer State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │  AwaitingHeader  │ ← scan for CRLFCRLF
//!        └────────┬─────────┘
//!                 │ header found: read Content-Length, consume header
//!                 ▼
//!        ┌──────────────────┐
//!        │   AwaitingBody   │ ← wait for declared_body_length bytes
//!        └────────┬─────────┘
//!                 │ body buffered: consume it
//!                 ▼
//!          RequestComplete  → back to AwaitingHeader
//! ```
//!
//! # Example
//!
//! ```
//! use ringframe::http::framer::{Frame, RequestFramer};
//!
//! let mut framer = RequestFramer::new(1024);
//! framer.on_bytes_received(b"GET / HTTP/1.1\r\nContent-Length: 2\r\n\r\n");
//! assert_eq!(framer.try_frame_one(), Ok(Frame::NeedMoreData));
//!
//! framer.on_bytes_received(b"OK");
//! assert!(matches!(framer.try_frame_one(), Ok(Frame::RequestComplete(_))));
//! ```

pub mod connection;
pub mod framer;
pub mod parser;
pub mod ring;
pub mod writer;

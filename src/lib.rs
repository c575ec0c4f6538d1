//! ringframe - incremental HTTP request framing over a fixed ring buffer
//!
//! Core library for request framing and the single-connection server around it.

pub mod config;
pub mod http;
pub mod server;

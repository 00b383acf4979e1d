//! RESP (Redis Serialization Protocol) support.
//!
//! Only RESP2 is spoken: it is all a key handle ever needs, and every
//! Redis-compatible server understands it.
//!
//! ## Modules
//!
//! - [`codec`] - Incremental encoder and decoder
//! - [`error`] - Crate error type and decode errors
//! - [`frame`] - The [`Frame`](frame::Frame) value model

pub mod codec;
/// Error types.
pub mod error;
pub mod frame;

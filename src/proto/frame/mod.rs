//! RESP frame types.
//!
//! A [`Frame`] is one complete protocol value: a command on the way out, a
//! reply on the way back.

/// Frame type definitions.
pub mod types;

pub use types::Frame;

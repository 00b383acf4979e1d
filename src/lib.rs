//! # redkey
//!
//! Typed handles over single Redis keys, backed by an async multiplexed
//! client.
//!
//! A handle names one key and exposes the commands of its data type as
//! async methods. It stores nothing remote: every call is exactly one
//! command through a [`CommandClient`]. The bundled [`Client`] is one such
//! client; anything implementing the trait works.
//!
//! ## Features
//!
//! - `tls` - TLS/SSL support for `rediss://` addresses
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use redkey::{Client, HashHandle, StringHandle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(Client::connect("redis://localhost:6379").await?);
//!
//!     let greeting = StringHandle::new(Arc::clone(&client), "greeting").await?;
//!     greeting.set("hello").await?;
//!     greeting.expire(60).await?;
//!
//!     let user = HashHandle::new(client, "user:1").await?;
//!     user.hset([("name", "ada")]).await?;
//!     println!("{:?}", user.hgetall().await?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub(crate) mod core;
pub mod handle;
pub mod proto;

pub use crate::core::builder::ClientBuilder;
pub use crate::core::command::{self, Cmd, InsertPosition};
pub use crate::core::reply;
pub use crate::core::{Client, CommandClient, Error, Result};
pub use crate::handle::{
    HashHandle, KeyHandle, ListHandle, Metadata, SetHandle, StringHandle, Ttl,
};

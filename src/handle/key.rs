use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::core::command::{self, Cmd};
use crate::core::reply;
use crate::core::CommandClient;
use crate::proto::error::{Error, Result};
use crate::proto::frame::Frame;

/// Caller-supplied attributes attached to a handle at construction.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Attribute names a handle owns itself; metadata may not use them.
pub const RESERVED_ATTRIBUTES: [&str; 2] = ["client", "name"];

/// Remaining time to live of a key, as reported by `TTL` / `PTTL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The key expires after this long.
    Expires(Duration),
    /// The key exists and has no expiry.
    Persistent,
    /// The key does not exist.
    Missing,
}

impl Ttl {
    /// Interprets a `TTL` reply.
    pub fn from_seconds(reply: i64) -> Self {
        Self::from_reply(reply, Duration::from_secs)
    }

    /// Interprets a `PTTL` reply.
    pub fn from_millis(reply: i64) -> Self {
        Self::from_reply(reply, Duration::from_millis)
    }

    fn from_reply(reply: i64, unit: fn(u64) -> Duration) -> Self {
        match reply {
            -2 => Ttl::Missing,
            n if n < 0 => Ttl::Persistent,
            n => Ttl::Expires(unit(n.unsigned_abs())),
        }
    }

    /// The remaining duration, if the key has one.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Ttl::Expires(d) => Some(*d),
            _ => None,
        }
    }
}

/// A named reference to one key in the store, bound to a command client.
///
/// The handle holds no remote state. Every operation issues exactly one
/// command through the client and converts its reply; deleting the key
/// remotely leaves the handle usable.
pub struct KeyHandle<C> {
    name: String,
    client: Arc<C>,
    metadata: Metadata,
}

impl<C: CommandClient> KeyHandle<C> {
    /// Binds `name` on `client` after probing the client with PING.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidClient`] if the probe fails for any reason.
    pub async fn new(client: Arc<C>, name: impl Into<String>) -> Result<Self> {
        Self::with_metadata(client, name, Metadata::new()).await
    }

    /// Like [`new`](Self::new), attaching caller metadata to the handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidClient`] without contacting the server if the
    /// metadata uses a name in [`RESERVED_ATTRIBUTES`], and
    /// [`Error::InvalidClient`] if the probe fails.
    pub async fn with_metadata(
        client: Arc<C>,
        name: impl Into<String>,
        metadata: Metadata,
    ) -> Result<Self> {
        let name = name.into();

        if let Some(reserved) = metadata
            .keys()
            .find(|attr| RESERVED_ATTRIBUTES.contains(&attr.as_str()))
        {
            warn!(key = %name, attribute = %reserved, "metadata shadows a reserved attribute");
            return Err(Error::invalid_client(format!(
                "metadata may not set reserved attribute `{reserved}`"
            )));
        }

        if let Err(e) = client.probe().await {
            warn!(key = %name, error = %e, "client failed the capability probe");
            return Err(Error::invalid_client(format!("capability probe failed: {e}")));
        }

        debug!(key = %name, attributes = metadata.len(), "key handle bound");
        Ok(Self {
            name,
            client,
            metadata,
        })
    }

    pub(crate) async fn query(&self, cmd: Cmd) -> Result<Frame> {
        trace!(key = %self.name, command = %String::from_utf8_lossy(cmd.name()), "dispatch");
        self.client.execute(cmd).await
    }

    /// Deletes the key. Returns the number of keys removed.
    pub async fn delete(&self) -> Result<i64> {
        reply::frame_to_int(self.query(command::del(self.key())).await?)
    }

    /// Renames the key on the server and returns the new name.
    ///
    /// The handle keeps its original name; bind a new handle to follow the
    /// key.
    pub async fn rename(&self, new_name: impl Into<String>) -> Result<String> {
        let new_name = new_name.into();
        let frame = self
            .query(command::rename(self.key(), new_name.clone()))
            .await?;
        reply::frame_to_unit(frame)?;
        Ok(new_name)
    }

    /// Renames the key only if `new_name` does not exist yet.
    pub async fn rename_nx(&self, new_name: impl Into<String>) -> Result<bool> {
        let frame = self
            .query(command::renamenx(self.key(), new_name.into()))
            .await?;
        reply::frame_to_bool(frame)
    }

    /// Returns true if the key exists.
    pub async fn exists(&self) -> Result<bool> {
        reply::frame_to_bool(self.query(command::exists(self.key())).await?)
    }

    /// Sets a timeout in seconds. Returns false if the key does not exist.
    pub async fn expire(&self, seconds: i64) -> Result<bool> {
        reply::frame_to_bool(self.query(command::expire(self.key(), seconds)).await?)
    }

    /// Sets a timeout in milliseconds.
    pub async fn pexpire(&self, milliseconds: i64) -> Result<bool> {
        reply::frame_to_bool(
            self.query(command::pexpire(self.key(), milliseconds))
                .await?,
        )
    }

    /// Expires the key at a unix timestamp in seconds.
    pub async fn expireat(&self, timestamp: i64) -> Result<bool> {
        reply::frame_to_bool(
            self.query(command::expireat(self.key(), timestamp))
                .await?,
        )
    }

    /// Expires the key at a unix timestamp in milliseconds.
    pub async fn pexpireat(&self, timestamp_ms: i64) -> Result<bool> {
        reply::frame_to_bool(
            self.query(command::pexpireat(self.key(), timestamp_ms))
                .await?,
        )
    }

    /// Moves the key to another logical database.
    pub async fn move_to(&self, db: u8) -> Result<bool> {
        reply::frame_to_bool(self.query(command::move_db(self.key(), db)).await?)
    }

    /// Removes any timeout. Returns false if there was none.
    pub async fn persist(&self) -> Result<bool> {
        reply::frame_to_bool(self.query(command::persist(self.key())).await?)
    }

    /// Remaining time to live, second resolution.
    pub async fn ttl(&self) -> Result<Ttl> {
        let n = reply::frame_to_int(self.query(command::ttl(self.key())).await?)?;
        Ok(Ttl::from_seconds(n))
    }

    /// Remaining time to live, millisecond resolution.
    pub async fn pttl(&self) -> Result<Ttl> {
        let n = reply::frame_to_int(self.query(command::pttl(self.key())).await?)?;
        Ok(Ttl::from_millis(n))
    }

    /// The stored type (`string`, `list`, ...), or `none` if absent.
    pub async fn keytype(&self) -> Result<String> {
        reply::frame_to_string(self.query(command::key_type(self.key())).await?)
    }

    /// Removes the key, reclaiming memory in the background.
    pub async fn unlink(&self) -> Result<i64> {
        reply::frame_to_int(self.query(command::unlink(self.key())).await?)
    }

    /// Serialized value in the server's DUMP format, `None` if absent.
    pub async fn dump(&self) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(self.query(command::dump(self.key())).await?)
    }
}

impl<C> KeyHandle<C> {
    /// The key name this handle refers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The client commands are sent through.
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Metadata supplied at construction.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Looks up one metadata attribute.
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.metadata.get(name)
    }

    pub(crate) fn key(&self) -> Bytes {
        Bytes::copy_from_slice(self.name.as_bytes())
    }
}

impl<C> Clone for KeyHandle<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            client: Arc::clone(&self.client),
            metadata: self.metadata.clone(),
        }
    }
}

impl<C> fmt::Debug for KeyHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHandle")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

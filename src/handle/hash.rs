use bytes::Bytes;

use crate::core::command;
use crate::core::reply;
use crate::core::CommandClient;
use crate::proto::error::Result;

key_variant! {
    /// Handle over a hash key.
    ///
    /// Field names and values both come back as raw [`Bytes`], so a field
    /// read from [`hkeys`](HashHandle::hkeys) can be passed straight back to
    /// [`hget`](HashHandle::hget) or [`hdel`](HashHandle::hdel).
    HashHandle
}

impl<C: CommandClient> HashHandle<C> {
    /// Removes fields. Returns how many existed.
    pub async fn hdel<I, F>(&self, fields: I) -> Result<i64>
    where
        I: IntoIterator<Item = F>,
        F: Into<Bytes>,
    {
        reply::frame_to_int(self.query(command::hdel(self.key(), fields)).await?)
    }

    /// Returns true if `field` is present.
    pub async fn hexists(&self, field: impl Into<Bytes>) -> Result<bool> {
        reply::frame_to_bool(self.query(command::hexists(self.key(), field)).await?)
    }

    /// Gets one field.
    pub async fn hget(&self, field: impl Into<Bytes>) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(self.query(command::hget(self.key(), field)).await?)
    }

    /// All field/value pairs, in no particular order.
    pub async fn hgetall(&self) -> Result<Vec<(Bytes, Bytes)>> {
        reply::frame_to_pairs(self.query(command::hgetall(self.key())).await?)
    }

    /// Increments an integer field. Returns the new value.
    pub async fn hincrby(&self, field: impl Into<Bytes>, increment: i64) -> Result<i64> {
        reply::frame_to_int(
            self.query(command::hincrby(self.key(), field, increment))
                .await?,
        )
    }

    /// Increments a float field. Returns the new value.
    pub async fn hincrbyfloat(&self, field: impl Into<Bytes>, increment: f64) -> Result<f64> {
        reply::frame_to_float(
            self.query(command::hincrbyfloat(self.key(), field, increment))
                .await?,
        )
    }

    /// All field names.
    pub async fn hkeys(&self) -> Result<Vec<Bytes>> {
        reply::frame_to_vec_bytes(self.query(command::hkeys(self.key())).await?)
    }

    /// Number of fields.
    pub async fn hlen(&self) -> Result<usize> {
        reply::frame_to_len(self.query(command::hlen(self.key())).await?)
    }

    /// Gets several fields at once, `None` for each missing one.
    pub async fn hmget<I, F>(&self, fields: I) -> Result<Vec<Option<Bytes>>>
    where
        I: IntoIterator<Item = F>,
        F: Into<Bytes>,
    {
        reply::frame_to_vec_opt_bytes(self.query(command::hmget(self.key(), fields)).await?)
    }

    /// Sets fields, overwriting existing values. Returns how many fields
    /// were added.
    pub async fn hset<I, F, V>(&self, pairs: I) -> Result<i64>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<Bytes>,
        V: Into<Bytes>,
    {
        reply::frame_to_int(self.query(command::hset(self.key(), pairs)).await?)
    }

    /// Sets `field` only if it does not exist yet.
    pub async fn hsetnx(&self, field: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<bool> {
        reply::frame_to_bool(
            self.query(command::hsetnx(self.key(), field, value))
                .await?,
        )
    }

    /// Length of a field's value, 0 if missing.
    pub async fn hstrlen(&self, field: impl Into<Bytes>) -> Result<usize> {
        reply::frame_to_len(self.query(command::hstrlen(self.key(), field)).await?)
    }

    /// All values.
    pub async fn hvals(&self) -> Result<Vec<Bytes>> {
        reply::frame_to_vec_bytes(self.query(command::hvals(self.key())).await?)
    }

    /// Same as [`hlen`](Self::hlen).
    pub async fn len(&self) -> Result<usize> {
        self.hlen().await
    }
}

use bytes::Bytes;

use crate::core::command;
use crate::core::reply;
use crate::core::CommandClient;
use crate::proto::error::Result;

key_variant! {
    /// Handle over a string key.
    ///
    /// Values go in as anything convertible to [`Bytes`] and come back as
    /// raw [`Bytes`]; decoding is left to the caller.
    StringHandle
}

impl<C: CommandClient> StringHandle<C> {
    /// Appends to the value. Returns the new length.
    pub async fn append(&self, value: impl Into<Bytes>) -> Result<i64> {
        reply::frame_to_int(self.query(command::append(self.key(), value)).await?)
    }

    /// Counts set bits in the byte range `start..=stop`.
    pub async fn bitcount(&self, start: i64, stop: i64) -> Result<i64> {
        reply::frame_to_int(
            self.query(command::bitcount(self.key(), start, stop))
                .await?,
        )
    }

    /// Gets the value, `None` if the key does not exist.
    pub async fn get(&self) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(self.query(command::get(self.key())).await?)
    }

    /// Sets the value, overwriting any existing one.
    pub async fn set(&self, value: impl Into<Bytes>) -> Result<()> {
        reply::frame_to_unit(self.query(command::set(self.key(), value)).await?)
    }

    /// Sets the value only if the key does not exist. Returns whether it
    /// was written.
    pub async fn set_nx(&self, value: impl Into<Bytes>) -> Result<bool> {
        reply::frame_to_written(self.query(command::set_nx(self.key(), value)).await?)
    }

    /// Sets the value with an expiry in seconds.
    pub async fn setex(&self, value: impl Into<Bytes>, seconds: u64) -> Result<()> {
        reply::frame_to_unit(
            self.query(command::setex(self.key(), seconds, value))
                .await?,
        )
    }

    /// Sets the value with an expiry in milliseconds.
    pub async fn psetex(&self, value: impl Into<Bytes>, milliseconds: u64) -> Result<()> {
        reply::frame_to_unit(
            self.query(command::psetex(self.key(), milliseconds, value))
                .await?,
        )
    }

    /// Sets a new value and returns the old one.
    pub async fn getset(&self, value: impl Into<Bytes>) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(self.query(command::getset(self.key(), value)).await?)
    }

    /// Decrements by one. Returns the new value.
    pub async fn decr(&self) -> Result<i64> {
        reply::frame_to_int(self.query(command::decr(self.key())).await?)
    }

    /// Decrements by `amount`.
    pub async fn decrby(&self, amount: i64) -> Result<i64> {
        reply::frame_to_int(self.query(command::decr_by(self.key(), amount)).await?)
    }

    /// Increments by one. Returns the new value.
    pub async fn incr(&self) -> Result<i64> {
        reply::frame_to_int(self.query(command::incr(self.key())).await?)
    }

    /// Increments by `amount`.
    pub async fn incrby(&self, amount: i64) -> Result<i64> {
        reply::frame_to_int(self.query(command::incr_by(self.key(), amount)).await?)
    }

    /// Increments by a float amount. Returns the new value.
    pub async fn incrbyfloat(&self, amount: f64) -> Result<f64> {
        reply::frame_to_float(
            self.query(command::incr_by_float(self.key(), amount))
                .await?,
        )
    }

    /// Returns the substring `start..=stop`; negative offsets count from
    /// the end.
    pub async fn getrange(&self, start: i64, stop: i64) -> Result<Bytes> {
        let frame = self
            .query(command::getrange(self.key(), start, stop))
            .await?;
        Ok(reply::frame_to_bytes(frame)?.unwrap_or_default())
    }

    /// Overwrites part of the value starting at `offset`. Returns the new
    /// length.
    pub async fn setrange(&self, value: impl Into<Bytes>, offset: u64) -> Result<i64> {
        reply::frame_to_int(
            self.query(command::setrange(self.key(), offset, value))
                .await?,
        )
    }

    /// Length of the value, 0 if the key does not exist.
    pub async fn strlen(&self) -> Result<usize> {
        reply::frame_to_len(self.query(command::strlen(self.key())).await?)
    }

    /// Same as [`strlen`](Self::strlen).
    pub async fn len(&self) -> Result<usize> {
        self.strlen().await
    }
}

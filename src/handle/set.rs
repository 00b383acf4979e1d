use bytes::Bytes;
use futures::stream::{self, Stream, TryStreamExt};

use crate::core::command;
use crate::core::reply;
use crate::core::CommandClient;
use crate::proto::error::Result;

key_variant! {
    /// Handle over a set key.
    SetHandle
}

impl<C: CommandClient> SetHandle<C> {
    /// Adds members. Returns how many were new.
    pub async fn sadd<I, T>(&self, members: I) -> Result<i64>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        reply::frame_to_int(self.query(command::sadd(self.key(), members)).await?)
    }

    /// Number of members.
    pub async fn scard(&self) -> Result<usize> {
        reply::frame_to_len(self.query(command::scard(self.key())).await?)
    }

    /// Members of this set absent from every set in `others`.
    pub async fn sdiff<I, T>(&self, others: I) -> Result<Vec<Bytes>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        reply::frame_to_vec_bytes(self.query(command::sdiff(self.key(), others)).await?)
    }

    /// Stores [`sdiff`](Self::sdiff) into `destination`. Returns its size.
    pub async fn sdiffstore<I, T>(&self, destination: impl Into<Bytes>, others: I) -> Result<i64>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        let cmd = command::sdiffstore(destination, self.key(), others);
        reply::frame_to_int(self.query(cmd).await?)
    }

    /// Members shared with every set in `others`.
    pub async fn sinter<I, T>(&self, others: I) -> Result<Vec<Bytes>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        reply::frame_to_vec_bytes(self.query(command::sinter(self.key(), others)).await?)
    }

    /// Stores [`sinter`](Self::sinter) into `destination`. Returns its size.
    pub async fn sinterstore<I, T>(&self, destination: impl Into<Bytes>, others: I) -> Result<i64>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        let cmd = command::sinterstore(destination, self.key(), others);
        reply::frame_to_int(self.query(cmd).await?)
    }

    /// Returns true if `member` is in the set.
    pub async fn sismember(&self, member: impl Into<Bytes>) -> Result<bool> {
        reply::frame_to_bool(self.query(command::sismember(self.key(), member)).await?)
    }

    /// All members, in no particular order.
    pub async fn smembers(&self) -> Result<Vec<Bytes>> {
        reply::frame_to_vec_bytes(self.query(command::smembers(self.key())).await?)
    }

    /// Moves `member` into `destination`. Returns false if it was not a
    /// member here.
    pub async fn smove(
        &self,
        destination: impl Into<Bytes>,
        member: impl Into<Bytes>,
    ) -> Result<bool> {
        let cmd = command::smove(self.key(), destination, member);
        reply::frame_to_bool(self.query(cmd).await?)
    }

    /// Same as [`scard`](Self::scard).
    pub async fn len(&self) -> Result<usize> {
        self.scard().await
    }

    /// Streams the members, fetched with SMEMBERS on first poll.
    pub fn iter(&self) -> impl Stream<Item = Result<Bytes>> + Send + '_ {
        stream::once(self.smembers())
            .map_ok(|members| stream::iter(members.into_iter().map(Ok)))
            .try_flatten()
    }
}

use bytes::Bytes;
use futures::stream::{self, Stream, TryStreamExt};

use crate::core::command::{self, InsertPosition};
use crate::core::reply;
use crate::core::CommandClient;
use crate::proto::error::Result;

key_variant! {
    /// Handle over a list key.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use futures::TryStreamExt;
    /// use redkey::{Client, ListHandle};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Arc::new(Client::connect("redis://localhost:6379").await?);
    /// let jobs = ListHandle::new(client, "jobs").await?;
    /// jobs.rpush(["a", "b"]).await?;
    ///
    /// let all: Vec<_> = jobs.iter().try_collect().await?;
    /// assert_eq!(all.len(), jobs.len().await?);
    /// # Ok(())
    /// # }
    /// ```
    ListHandle
}

impl<C: CommandClient> ListHandle<C> {
    /// Prepends elements. Returns the new length.
    pub async fn lpush<I, T>(&self, elements: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        reply::frame_to_len(self.query(command::lpush(self.key(), elements)).await?)
    }

    /// Appends elements. Returns the new length.
    pub async fn rpush<I, T>(&self, elements: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        reply::frame_to_len(self.query(command::rpush(self.key(), elements)).await?)
    }

    /// Prepends only if the list already exists; returns 0 otherwise.
    pub async fn lpushx<I, T>(&self, elements: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        reply::frame_to_len(self.query(command::lpushx(self.key(), elements)).await?)
    }

    /// Appends only if the list already exists; returns 0 otherwise.
    pub async fn rpushx<I, T>(&self, elements: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<Bytes>,
    {
        reply::frame_to_len(self.query(command::rpushx(self.key(), elements)).await?)
    }

    /// Element at `index`, `None` when out of range.
    pub async fn lindex(&self, index: i64) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(self.query(command::lindex(self.key(), index)).await?)
    }

    /// Inserts `element` next to the first occurrence of `pivot`.
    ///
    /// Returns the new length, `-1` if the pivot was not found and `0` if
    /// the key does not exist.
    pub async fn linsert(
        &self,
        position: InsertPosition,
        pivot: impl Into<Bytes>,
        element: impl Into<Bytes>,
    ) -> Result<i64> {
        let cmd = command::linsert(self.key(), position, pivot, element);
        reply::frame_to_int(self.query(cmd).await?)
    }

    /// Number of elements.
    pub async fn llen(&self) -> Result<usize> {
        reply::frame_to_len(self.query(command::llen(self.key())).await?)
    }

    /// Removes and returns the first element.
    pub async fn lpop(&self) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(self.query(command::lpop(self.key())).await?)
    }

    /// Removes and returns the last element.
    pub async fn rpop(&self) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(self.query(command::rpop(self.key())).await?)
    }

    /// Replaces the element at `index`.
    pub async fn lset(&self, index: i64, element: impl Into<Bytes>) -> Result<()> {
        reply::frame_to_unit(
            self.query(command::lset(self.key(), index, element))
                .await?,
        )
    }

    /// Elements `start..=stop`; negative indexes count from the end.
    pub async fn lrange(&self, start: i64, stop: i64) -> Result<Vec<Bytes>> {
        reply::frame_to_vec_bytes(
            self.query(command::lrange(self.key(), start, stop))
                .await?,
        )
    }

    /// Removes occurrences of `element`: the first `count` from the head
    /// when positive, from the tail when negative, all when zero.
    ///
    /// Takes a single element because LREM does. To remove several values,
    /// call it once per value.
    pub async fn lrem(&self, count: i64, element: impl Into<Bytes>) -> Result<i64> {
        reply::frame_to_int(
            self.query(command::lrem(self.key(), count, element))
                .await?,
        )
    }

    /// Keeps only `start..=stop`.
    pub async fn ltrim(&self, start: i64, stop: i64) -> Result<()> {
        reply::frame_to_unit(
            self.query(command::ltrim(self.key(), start, stop))
                .await?,
        )
    }

    /// Pops the last element and pushes it onto `destination`.
    pub async fn rpoplpush(&self, destination: impl Into<Bytes>) -> Result<Option<Bytes>> {
        reply::frame_to_bytes(
            self.query(command::rpoplpush(self.key(), destination))
                .await?,
        )
    }

    /// The whole list in one round trip.
    pub async fn lelements(&self) -> Result<Vec<Bytes>> {
        self.lrange(0, -1).await
    }

    /// Same as [`llen`](Self::llen).
    pub async fn len(&self) -> Result<usize> {
        self.llen().await
    }

    /// Streams the list's elements.
    ///
    /// Nothing is sent until the stream is first polled. Each call fetches
    /// the list afresh, so a new stream reflects writes made since the last
    /// one.
    pub fn iter(&self) -> impl Stream<Item = Result<Bytes>> + Send + '_ {
        stream::once(self.lelements())
            .map_ok(|elements| stream::iter(elements.into_iter().map(Ok)))
            .try_flatten()
    }
}

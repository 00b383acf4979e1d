//! Basic usage of redkey's typed key handles.
//!
//! Run with: cargo run --example basic

use std::sync::Arc;

use futures::TryStreamExt;
use redkey::{Client, HashHandle, InsertPosition, ListHandle, Metadata, Result, StringHandle};

#[tokio::main]
async fn main() -> Result<()> {
    // Connect to Redis server
    let client = Arc::new(Client::connect("redis://127.0.0.1:6379").await?);

    println!("Connected to Redis!");

    // Strings
    let greeting = StringHandle::new(Arc::clone(&client), "greeting").await?;
    greeting.set("Hello").await?;
    greeting.append(", redkey!").await?;
    if let Some(value) = greeting.get().await? {
        println!("GET greeting: {}", String::from_utf8_lossy(&value));
    }
    greeting.expire(60).await?;
    println!("TTL greeting: {:?}", greeting.ttl().await?);

    // Hashes, with metadata attached to the handle
    let mut metadata = Metadata::new();
    metadata.insert("owner".to_string(), serde_json::json!("demo"));
    let user = HashHandle::with_metadata(Arc::clone(&client), "user:1", metadata).await?;
    user.hset([("name", "Ada"), ("lang", "Rust")]).await?;
    println!(
        "HGETALL {} (owner {:?}): {:?}",
        user.name(),
        user.attribute("owner"),
        user.hgetall().await?
    );

    // Lists
    let queue = ListHandle::new(Arc::clone(&client), "queue").await?;
    queue.rpush(["a", "c"]).await?;
    queue.linsert(InsertPosition::Before, "c", "b").await?;
    let items: Vec<_> = queue.iter().try_collect().await?;
    println!("{} items in queue: {:?}", queue.len().await?, items);

    // Clean up
    greeting.delete().await?;
    user.delete().await?;
    queue.delete().await?;

    Ok(())
}

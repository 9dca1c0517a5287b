//! Walk through the read-through cache with in-memory storage
//!
//! Run with `cargo run --example cache_aside`. Set `REDIS_URL` to use a real
//! Redis instance instead of the process-local cache.

use curio::prelude::*;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    curio::telemetry::init(&LoggingConfig::default())?;

    let cache = match std::env::var("REDIS_URL") {
        Ok(url) => CacheManager::new(&CacheConfig::new(url, 3600)),
        Err(_) => CacheManager::in_memory().0,
    };
    println!("cache backend: {}", cache.backend_name());

    let stores = Stores::new(&InMemoryRepositories::new(), cache);

    let mut exhibit = CulturalExhibit {
        id: "123".to_string(),
        city: "Rome".to_string(),
        ..Default::default()
    };
    exhibit.name.insert("en".to_string(), "A".to_string());
    stores.cultural_exhibits.create(exhibit).await?;

    let first = stores.cultural_exhibits.require("123").await?;
    println!("first read: {:?}", first.name.get("en"));

    stores
        .cultural_exhibits
        .update("123", json!({ "name": { "en": "B" } }))
        .await?;
    let second = stores.cultural_exhibits.require("123").await?;
    println!("after update: {:?}", second.name.get("en"));

    let rome = CulturalExhibitFilter {
        city: Some("Rome".to_string()),
        ..Default::default()
    };
    println!("list key: {}", CulturalExhibit::POLICY.list_key(&rome));
    println!("{} exhibit(s) in Rome", stores.cultural_exhibits.list(&rome).await?.len());

    let health = cache_health_line(stores.cache()).await;
    println!("{health}");

    Ok(())
}

async fn cache_health_line(cache: &CacheManager) -> String {
    match cache.ping().await {
        Ok(()) => format!("cache {} reachable", cache.backend_name()),
        Err(err) => format!("cache {} unavailable: {err}", cache.backend_name()),
    }
}

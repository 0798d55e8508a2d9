//! # People Directory
//!
//! Demo entry point: preload a partial roster the way a server-rendered
//! listing would, then resolve people through the store. First lookups
//! fetch and complete each record, repeat lookups are cache hits.

use resource_sample::lifecycle::{setup_tracing, DirectorySystem};
use serde_json::json;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    info!("Starting people directory");

    let system = DirectorySystem::start().await.map_err(|e| e.to_string())?;

    // Partial rows: id and name only, marked incomplete so the first
    // lookup still fetches the full record.
    system
        .client
        .preload(json!([
            { "id": 1, "name": "John" },
            { "id": 2, "name": "Jane" },
            { "id": 3, "name": "Matt" },
        ]))
        .await
        .map_err(|e| e.to_string())?;

    for id in [1, 2, 3] {
        match system.client.person(id).await {
            Ok(person) => info!(id, name = %person.name, age = ?person.age, "Resolved person"),
            Err(e) => error!(id, error = %e, "Lookup failed"),
        }
    }

    // Served from cache: the records are complete now.
    let jane = system.client.person(2).await.map_err(|e| e.to_string())?;
    info!(name = %jane.name, "Cache hit");

    match system.client.profile().await {
        Ok(profile) => info!(name = %profile.name, age = profile.age, "Loaded profile"),
        Err(e) => error!(error = %e, "Profile fetch failed"),
    }

    if let Err(e) = system.client.person(99).await {
        info!(error = %e, "Missing person rejected with the parsed body");
    }

    system.shutdown().await?;
    info!("Directory shut down");
    Ok(())
}

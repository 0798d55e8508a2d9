use resource_sample::lifecycle::DirectorySystem;
use resource_sample::model::{Person, Profile};
use resource_store::mock::MockTransport;
use resource_store::StoreError;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn preloaded_rows_are_completed_on_first_lookup() {
    let system = DirectorySystem::start()
        .await
        .expect("Failed to start directory");

    system
        .client
        .preload(json!([{ "id": 3, "name": "Matt" }]))
        .await
        .expect("Failed to preload roster");

    let matt = system.client.person(3).await.expect("Failed to resolve person");
    assert_eq!(
        matt,
        Person {
            id: 3,
            name: "Matt".to_string(),
            age: Some(34),
            middle: Some("Ryu".to_string()),
        }
    );

    system.shutdown().await.expect("Failed to shutdown");
}

#[tokio::test]
async fn profile_is_fetched_once_and_then_cached() {
    let transport = Arc::new(MockTransport::new());
    transport.respond_ok("profile", None, json!({ "name": "Sean", "age": 34 }));

    let system = DirectorySystem::start_with(transport.clone())
        .await
        .expect("Failed to start directory");

    let first = system.client.profile().await.expect("Failed to load profile");
    let second = system.client.profile().await.expect("Failed to load profile");

    assert_eq!(
        first,
        Profile {
            name: "Sean".to_string(),
            age: 34,
        }
    );
    assert_eq!(first, second);
    assert_eq!(transport.calls(), 1);

    system.shutdown().await.expect("Failed to shutdown");
}

#[tokio::test]
async fn missing_people_reject_with_the_parsed_body() {
    let system = DirectorySystem::start()
        .await
        .expect("Failed to start directory");

    let err = system.client.person(99).await.unwrap_err();
    match err {
        resource_sample::clients::DirectoryError::Store(StoreError::Fetch(body)) => {
            assert_eq!(body, json!({ "error": "person 99 not found" }));
        }
        other => panic!("Expected a fetch rejection, got {other:?}"),
    }

    system.shutdown().await.expect("Failed to shutdown");
}

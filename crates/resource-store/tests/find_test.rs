use resource_store::mock::MockTransport;
use resource_store::{
    DataStore, Entity, InjectOptions, RecordId, ResourceConfig, StoreActor, StoreError,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn start_store() -> (Arc<MockTransport>, DataStore) {
    let transport = Arc::new(MockTransport::new());
    let (actor, store) = StoreActor::new(transport.clone(), 32);
    tokio::spawn(actor.run());
    (transport, store)
}

async fn define_people(store: &DataStore) {
    store
        .define_resource(ResourceConfig::new("person").id_attribute("id"))
        .await
        .expect("Failed to define resource");
}

fn people() -> Value {
    json!([
        { "id": 1, "name": "John", "age": 54 },
        { "id": 2, "name": "Jane", "age": 24 },
        { "id": 3, "name": "Matt", "age": 34 },
    ])
}

// --- Collection resources ---

#[tokio::test]
async fn no_request_is_made_for_an_entity_already_in_the_store() {
    let (transport, store) = start_store();
    define_people(&store).await;
    store
        .inject("person", people(), InjectOptions::default())
        .await
        .unwrap();

    let jane = store
        .find("person", RecordId::from(2))
        .await
        .expect("Failed to find person 2");

    assert_eq!(jane.to_json(), json!({ "id": 2, "name": "Jane", "age": 24 }));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn a_successfully_fetched_entity_is_stored() {
    let (transport, store) = start_store();
    define_people(&store).await;
    transport.respond_ok(
        "person",
        RecordId::from(12345),
        json!({ "id": 12345, "name": "Gwen" }),
    );

    let gwen = store
        .find("person", RecordId::from(12345))
        .await
        .expect("Failed to find person 12345");

    let cached = store
        .get("person", RecordId::from(12345))
        .await
        .unwrap()
        .expect("Fetched person not cached");
    assert_eq!(cached.to_json(), json!({ "id": 12345, "name": "Gwen" }));
    assert!(Entity::ptr_eq(&gwen, &cached));
    assert!(store
        .is_complete("person", RecordId::from(12345))
        .await
        .unwrap());
}

#[tokio::test]
async fn find_rejects_with_the_parsed_error_body() {
    let (transport, store) = start_store();
    define_people(&store).await;
    transport.respond_err(
        "person",
        RecordId::from(12345),
        json!({ "error": "some error" }),
    );

    let err = store.find("person", RecordId::from(12345)).await.unwrap_err();
    match err {
        StoreError::Fetch(body) => assert_eq!(body, json!({ "error": "some error" })),
        other => panic!("Expected a fetch rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn an_incomplete_array_injection_is_completed_by_find() {
    let (transport, store) = start_store();
    define_people(&store).await;
    store
        .inject("person", people(), InjectOptions::incomplete())
        .await
        .unwrap();
    transport.respond_ok(
        "person",
        RecordId::from(3),
        json!({ "id": 3, "name": "Matt", "age": 34, "middle": "Ryu" }),
    );

    let before = store
        .get("person", RecordId::from(3))
        .await
        .unwrap()
        .expect("Injected person not cached");

    let matt = store
        .find("person", RecordId::from(3))
        .await
        .expect("Failed to find person 3");

    let after = store
        .get("person", RecordId::from(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        after.to_json(),
        json!({ "id": 3, "name": "Matt", "age": 34, "middle": "Ryu" })
    );
    // identity is preserved across the fetch
    assert!(Entity::ptr_eq(&before, &matt));
    assert!(Entity::ptr_eq(&after, &matt));
}

#[tokio::test]
async fn an_incomplete_single_injection_is_completed_by_find() {
    let (transport, store) = start_store();
    define_people(&store).await;
    store
        .inject(
            "person",
            json!({ "id": 3, "name": "Matt", "age": 34 }),
            InjectOptions::incomplete(),
        )
        .await
        .unwrap();
    transport.respond_ok(
        "person",
        RecordId::from(3),
        json!({ "id": 3, "name": "Matt", "age": 34, "middle": "Ryu" }),
    );

    let matt = store
        .find("person", RecordId::from(3))
        .await
        .expect("Failed to find person 3");

    let cached = store
        .get("person", RecordId::from(3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        cached.to_json(),
        json!({ "id": 3, "name": "Matt", "age": 34, "middle": "Ryu" })
    );
    assert!(Entity::ptr_eq(&cached, &matt));
}

#[tokio::test]
async fn no_refetch_once_an_incomplete_entity_turns_complete() {
    let (transport, store) = start_store();
    define_people(&store).await;
    store
        .inject(
            "person",
            json!({ "id": 3, "name": "Matt", "age": 34 }),
            InjectOptions::incomplete(),
        )
        .await
        .unwrap();
    transport.respond_ok(
        "person",
        RecordId::from(3),
        json!({ "id": 3, "name": "Matt", "age": 34, "middle": "Ryu" }),
    );

    store.find("person", RecordId::from(3)).await.unwrap();
    store.find("person", RecordId::from(3)).await.unwrap();

    assert_eq!(transport.calls_for("person", RecordId::from(3)), 1);
}

#[tokio::test]
async fn concurrent_finds_coalesce_onto_one_fetch() {
    let (transport, store) = start_store();
    define_people(&store).await;
    transport.respond_ok("person", RecordId::from(7), json!({ "id": 7, "name": "Ada" }));

    let (a, b) = tokio::join!(
        store.find("person", RecordId::from(7)),
        store.find("person", RecordId::from(7)),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(Entity::ptr_eq(&a, &b));
    assert_eq!(a.to_json(), json!({ "id": 7, "name": "Ada" }));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn a_failed_fetch_clears_the_in_flight_entry_so_find_can_retry() {
    let (transport, store) = start_store();
    define_people(&store).await;
    transport.respond_err("person", RecordId::from(5), json!({ "error": "down" }));

    assert!(store.find("person", RecordId::from(5)).await.is_err());

    transport.respond_ok("person", RecordId::from(5), json!({ "id": 5, "name": "Eve" }));
    let eve = store
        .find("person", RecordId::from(5))
        .await
        .expect("Retry after failure should fetch again");

    assert_eq!(eve.attribute("name"), Some(json!("Eve")));
    assert_eq!(transport.calls_for("person", RecordId::from(5)), 2);
}

#[tokio::test]
async fn find_on_a_collection_requires_an_id() {
    let (_transport, store) = start_store();
    define_people(&store).await;

    let err = store.find("person", None).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn find_on_an_undefined_resource_is_not_found() {
    let (_transport, store) = start_store();

    let err = store.find("ghost", RecordId::from(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

// --- Singular resources ---

#[tokio::test]
async fn an_unfetched_singular_resource_is_requested() {
    let (transport, store) = start_store();
    store
        .define_resource(ResourceConfig::new("profile"))
        .await
        .unwrap();
    transport.respond_ok("profile", None, json!({ "name": "Sean", "age": 34 }));

    store.find("profile", None).await.expect("Failed to find profile");

    let profile = store.get("profile", None).await.unwrap().unwrap();
    assert_eq!(profile.to_json(), json!({ "name": "Sean", "age": 34 }));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn a_fetched_singular_resource_is_not_requested_again() {
    let (transport, store) = start_store();
    store
        .define_resource(ResourceConfig::new("profile"))
        .await
        .unwrap();
    transport.respond_ok("profile", None, json!({ "name": "Sean", "age": 34 }));

    store.find("profile", None).await.unwrap();
    store.find("profile", None).await.unwrap();

    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn find_resolves_with_the_cached_entity_handle() {
    let (transport, store) = start_store();
    store
        .define_resource(ResourceConfig::new("profile"))
        .await
        .unwrap();
    transport.respond_ok("profile", None, json!({ "name": "Sean", "age": 34 }));

    let found = store.find("profile", None).await.unwrap();
    let cached = store.get("profile", None).await.unwrap().unwrap();

    assert!(Entity::ptr_eq(&found, &cached));
}

#[tokio::test]
async fn a_singular_find_rejects_with_the_parsed_error() {
    let (transport, store) = start_store();
    store
        .define_resource(ResourceConfig::new("profile"))
        .await
        .unwrap();
    transport.respond_err("profile", None, json!({ "error": "oh no!" }));

    let err = store.find("profile", None).await.unwrap_err();
    match err {
        StoreError::Fetch(body) => assert_eq!(body, json!({ "error": "oh no!" })),
        other => panic!("Expected a fetch rejection, got {other:?}"),
    }
}

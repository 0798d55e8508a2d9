use resource_store::mock::MockTransport;
use resource_store::{
    DataStore, Document, Entity, InjectOptions, RecordId, ResourceConfig, ResourceKind,
    StoreActor, StoreError,
};
use serde_json::json;
use std::sync::Arc;

fn start_store() -> (Arc<MockTransport>, DataStore) {
    let transport = Arc::new(MockTransport::new());
    let (actor, store) = StoreActor::new(transport.clone(), 32);
    tokio::spawn(actor.run());
    (transport, store)
}

#[tokio::test]
async fn create_instance_uses_the_configured_factory() {
    let (_transport, store) = start_store();

    store
        .define_resource(ResourceConfig::new("person").id_attribute("id").factory(|| {
            Box::new(Document::from_attributes(
                json!({ "species": "human" }).as_object().unwrap().clone(),
            ))
        }))
        .await
        .expect("Failed to define resource");

    let david = store
        .create_instance("person")
        .await
        .expect("Failed to create instance");
    assert_eq!(david.attribute("species"), Some(json!("human")));
}

#[tokio::test]
async fn id_attribute_alone_defines_a_collection() {
    let (_transport, store) = start_store();

    store
        .define_resource(ResourceConfig::new("employee").id_attribute("id"))
        .await
        .expect("Failed to define resource");

    let definition = store
        .definition("employee")
        .await
        .expect("Failed to look up definition");
    assert_eq!(definition.kind(), ResourceKind::Collection);
    assert!(store.get_all("employee").await.unwrap().is_empty());
}

#[tokio::test]
async fn bare_name_defines_a_singular_resource() {
    let (_transport, store) = start_store();

    store
        .define_resource(ResourceConfig::new("user"))
        .await
        .expect("Failed to define resource");

    let definition = store.definition("user").await.unwrap();
    assert_eq!(definition.kind(), ResourceKind::Singular);

    store
        .inject("user", json!({ "name": "Sean" }), InjectOptions::default())
        .await
        .unwrap();
    let user = store.get("user", None).await.unwrap().expect("User not cached");
    assert_eq!(user.attribute("name"), Some(json!("Sean")));
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let (_transport, store) = start_store();

    let err = store
        .define_resource(ResourceConfig::new("").id_attribute("id"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn collection_without_id_attribute_is_rejected() {
    let (_transport, store) = start_store();

    let err = store
        .define_resource(ResourceConfig::new("person").collection())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn redefining_a_name_fails_and_leaves_cache_state_alone() {
    let (_transport, store) = start_store();

    store
        .define_resource(ResourceConfig::new("student").id_attribute("id"))
        .await
        .expect("Failed to define resource");
    store
        .inject(
            "student",
            json!({ "id": 1, "name": "Alice" }),
            InjectOptions::default(),
        )
        .await
        .unwrap();
    let before = store
        .get("student", RecordId::from(1))
        .await
        .unwrap()
        .expect("Student not cached");

    let err = store
        .define_resource(ResourceConfig::new("student").id_attribute("id"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let after = store
        .get("student", RecordId::from(1))
        .await
        .unwrap()
        .expect("Student evicted by failed define");
    assert!(Entity::ptr_eq(&before, &after));
    assert_eq!(after.to_json(), json!({ "id": 1, "name": "Alice" }));
}

#[tokio::test]
async fn operations_on_undefined_resources_are_not_found() {
    let (_transport, store) = start_store();

    assert!(matches!(
        store.create_instance("ghost").await.unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        store.definition("ghost").await.unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        store.get("ghost", RecordId::from(1)).await.unwrap_err(),
        StoreError::NotFound(_)
    ));
}

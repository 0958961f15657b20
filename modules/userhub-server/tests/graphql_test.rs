//! GraphQL surface tests against the in-memory gateway. Covers the mutation,
//! query, and subscription resolvers end to end through the schema.

use std::sync::Arc;
use std::time::Duration;

use futures::{FutureExt, StreamExt};
use serde_json::json;
use tokio::time::timeout;

use userhub_core::{topics, AppConfig, MemoryGateway, ServerDeps};
use userhub_events::EventBus;
use userhub_server::graphql::{build_schema, AppSchema};

fn deps_with(gateway: MemoryGateway) -> Arc<ServerDeps> {
    let config = AppConfig {
        database_url: "postgres://unused".into(),
        port: 0,
        channel_queue_capacity: None,
        allowed_origins: Vec::new(),
    };
    Arc::new(ServerDeps::new(Arc::new(gateway), EventBus::new(), config))
}

async fn data(schema: &AppSchema, query: &str) -> serde_json::Value {
    let response = schema.execute(query).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().unwrap()
}

// =========================================================================
// Queries and mutations
// =========================================================================

#[tokio::test]
async fn create_user_returns_store_assigned_user() {
    let deps = deps_with(MemoryGateway::starting_at(7));
    let schema = build_schema(deps);

    let out = data(
        &schema,
        r#"mutation { createUser(name: "Ana", email: "ana@example.com") { id name email } }"#,
    )
    .await;

    assert_eq!(
        out,
        json!({"createUser": {"id": "7", "name": "Ana", "email": "ana@example.com"}})
    );
}

#[tokio::test]
async fn users_on_empty_store_is_an_empty_list() {
    let schema = build_schema(deps_with(MemoryGateway::new()));
    let out = data(&schema, "{ users { id } }").await;
    assert_eq!(out, json!({"users": []}));
}

#[tokio::test]
async fn create_user_with_empty_name_is_rejected_and_publishes_nothing() {
    let deps = deps_with(MemoryGateway::new());
    let schema = build_schema(deps.clone());
    let probe = deps.bus.subscribe(topics::USER_ADDED);

    let response = schema
        .execute(r#"mutation { createUser(name: "", email: "ana@example.com") { id } }"#)
        .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("invalid input"));
    assert!(probe.is_empty());
}

#[tokio::test]
async fn delete_missing_user_is_not_found_and_publishes_nothing() {
    let deps = deps_with(MemoryGateway::new());
    let schema = build_schema(deps.clone());
    let probe = deps.bus.subscribe(topics::USER_ADDED);

    let response = schema
        .execute(r#"mutation { deleteUser(id: "42") }"#)
        .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("not found"));
    assert!(probe.is_empty());
}

#[tokio::test]
async fn delete_existing_user_confirms_and_then_reads_null() {
    let schema = build_schema(deps_with(MemoryGateway::new()));

    data(
        &schema,
        r#"mutation { createUser(name: "Ana", email: "ana@example.com") { id } }"#,
    )
    .await;

    let out = data(&schema, r#"mutation { deleteUser(id: "1") }"#).await;
    assert_eq!(
        out,
        json!({"deleteUser": "User with ID 1 deleted successfully"})
    );

    let out = data(&schema, r#"{ user(id: "1") { id } }"#).await;
    assert_eq!(out, json!({"user": null}));
}

// =========================================================================
// Subscriptions
// =========================================================================

#[tokio::test]
async fn live_subscriber_receives_created_user() {
    let deps = deps_with(MemoryGateway::starting_at(7));
    let schema = build_schema(deps.clone());

    let mut sub = schema.execute_stream("subscription { userAdded { id name email } }");
    // First poll runs the subscription resolver and registers the channel.
    assert!(sub.next().now_or_never().is_none());
    assert_eq!(deps.bus.subscriber_count(topics::USER_ADDED), 1);

    schema
        .execute(r#"mutation { createUser(name: "Ana", email: "ana@example.com") { id } }"#)
        .await;

    let item = timeout(Duration::from_secs(1), sub.next())
        .await
        .expect("no event within 1s")
        .expect("subscription ended early");
    assert!(item.errors.is_empty());
    assert_eq!(
        item.data.into_json().unwrap(),
        json!({"userAdded": {"id": "7", "name": "Ana", "email": "ana@example.com"}})
    );
}

#[tokio::test]
async fn two_subscribers_both_receive_each_user_in_order() {
    let deps = deps_with(MemoryGateway::new());
    let schema = build_schema(deps.clone());

    let mut first = schema.execute_stream("subscription { userAdded { name } }");
    let mut second = schema.execute_stream("subscription { userAdded { name } }");
    assert!(first.next().now_or_never().is_none());
    assert!(second.next().now_or_never().is_none());
    assert_eq!(deps.bus.subscriber_count(topics::USER_ADDED), 2);

    for name in ["Ana", "Ben"] {
        data(
            &schema,
            &format!(r#"mutation {{ createUser(name: "{name}", email: "{name}@example.com") {{ id }} }}"#),
        )
        .await;
    }

    for sub in [&mut first, &mut second] {
        for expected in ["Ana", "Ben"] {
            let item = timeout(Duration::from_secs(1), sub.next())
                .await
                .expect("no event within 1s")
                .expect("subscription ended early");
            assert_eq!(
                item.data.into_json().unwrap(),
                json!({"userAdded": {"name": expected}})
            );
        }
    }
}

#[tokio::test]
async fn subscriber_registered_after_create_sees_no_replay() {
    let deps = deps_with(MemoryGateway::new());
    let schema = build_schema(deps.clone());

    data(
        &schema,
        r#"mutation { createUser(name: "Ana", email: "ana@example.com") { id } }"#,
    )
    .await;

    let mut sub = schema.execute_stream("subscription { userAdded { name } }");
    assert!(sub.next().now_or_never().is_none());

    data(
        &schema,
        r#"mutation { createUser(name: "Ben", email: "ben@example.com") { id } }"#,
    )
    .await;

    let item = timeout(Duration::from_secs(1), sub.next())
        .await
        .expect("no event within 1s")
        .expect("subscription ended early");
    assert_eq!(
        item.data.into_json().unwrap(),
        json!({"userAdded": {"name": "Ben"}})
    );
}

#[tokio::test]
async fn dropping_the_subscription_deregisters_its_channel() {
    let deps = deps_with(MemoryGateway::new());
    let schema = build_schema(deps.clone());

    let mut sub = schema.execute_stream("subscription { userAdded { id } }");
    assert!(sub.next().now_or_never().is_none());
    assert_eq!(deps.bus.subscriber_count(topics::USER_ADDED), 1);

    drop(sub);
    assert_eq!(deps.bus.subscriber_count(topics::USER_ADDED), 0);
}

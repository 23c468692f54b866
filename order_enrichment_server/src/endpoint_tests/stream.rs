use actix_web::{http::StatusCode, web, web::ServiceConfig};
use oeg_common::TaxRate;
use order_enrichment_engine::{
    db_types::OrderId,
    events::EventProducers,
    test_utils::{prepare_test_env, MemoryEnrichedStore},
    StreamConsumer,
};
use serde_json::json;

use super::helpers::{get_request, post_request};
use crate::routes::StreamBatchRoute;

fn configure_with(store: MemoryEnrichedStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let consumer = StreamConsumer::new(store, TaxRate::default(), EventProducers::default());
        cfg.service(StreamBatchRoute::<MemoryEnrichedStore>::new()).app_data(web::Data::new(consumer));
    }
}

fn insert_record(order_id: &str, amount: &str) -> serde_json::Value {
    json!({
        "kind": "INSERT",
        "new_image": {
            "order_id": {"S": order_id},
            "customer": {"S": "anonymous"},
            "amount": {"N": amount}
        }
    })
}

#[actix_web::test]
async fn insert_events_are_enriched_and_written() {
    prepare_test_env();
    let store = MemoryEnrichedStore::new();
    let batch = json!({"records": [insert_record("a", "100.00"), insert_record("b", "0.00")]});
    let (status, body) = post_request("/stream/batch", batch, configure_with(store.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["ok"], json!(true));
    assert_eq!(response["received"], json!(2));
    assert_eq!(response["written"], json!(2));
    assert_eq!(response["failures"], json!([]));

    let a = store.get(&OrderId("a".into())).expect("order a not written");
    assert_eq!(a.subtotal.to_string(), "100.00");
    assert_eq!(a.tax.to_string(), "19.00");
    assert_eq!(a.total.to_string(), "119.00");
    let b = store.get(&OrderId("b".into())).expect("order b not written");
    assert_eq!(b.total.to_string(), "0.00");
}

#[actix_web::test]
async fn modify_and_remove_events_produce_zero_writes() {
    prepare_test_env();
    let store = MemoryEnrichedStore::new();
    let batch = json!({"records": [
        {"kind": "MODIFY", "new_image": {"order_id": {"S": "a"}, "amount": {"N": "1.00"}}},
        {"kind": "REMOVE"}
    ]});
    let (status, body) = post_request("/stream/batch", batch, configure_with(store.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["ok"], json!(true));
    assert_eq!(response["skipped"], json!(2));
    assert_eq!(response["written"], json!(0));
    assert!(store.is_empty());
}

#[actix_web::test]
async fn a_bad_event_fails_alone() {
    prepare_test_env();
    let store = MemoryEnrichedStore::new();
    let batch = json!({"records": [
        {"kind": "INSERT", "new_image": {"order_id": {"S": "broken"}}},
        insert_record("good", "10.00")
    ]});
    let (status, body) = post_request("/stream/batch", batch, configure_with(store.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["ok"], json!(false));
    assert_eq!(response["written"], json!(1));
    assert_eq!(response["failures"][0]["index"], json!(0));
    assert_eq!(response["failures"][0]["order_id"], json!("broken"));
    let error = response["failures"][0]["error"].as_str().unwrap();
    assert!(error.contains("amount"), "unexpected error: {error}");
    assert!(store.get(&OrderId("good".into())).is_some());
    assert!(store.get(&OrderId("broken".into())).is_none());
}

#[actix_web::test]
async fn a_write_failure_is_reported_for_redelivery() {
    prepare_test_env();
    let store = MemoryEnrichedStore::new();
    store.fail_on(OrderId("poison".into()));
    let batch = json!({"records": [insert_record("poison", "1.00"), insert_record("fine", "2.00")]});
    let (_, body) = post_request("/stream/batch", batch, configure_with(store.clone())).await;
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["ok"], json!(false));
    assert_eq!(response["written"], json!(1));
    assert_eq!(response["failures"][0]["order_id"], json!("poison"));
    assert!(store.get(&OrderId("fine".into())).is_some());
}

#[actix_web::test]
async fn replaying_a_batch_is_idempotent() {
    prepare_test_env();
    let store = MemoryEnrichedStore::new();
    let batch = json!({"records": [insert_record("dup", "10.00")]});
    let (_, _) = post_request("/stream/batch", batch.clone(), configure_with(store.clone())).await;
    let after_one = store.get(&OrderId("dup".into())).unwrap();
    let (_, body) = post_request("/stream/batch", batch, configure_with(store.clone())).await;
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["ok"], json!(true));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&OrderId("dup".into())).unwrap(), after_one);
}

#[actix_web::test]
async fn an_empty_batch_is_ok() {
    prepare_test_env();
    let (status, body) = post_request("/stream/batch", json!({"records": []}), configure_with(MemoryEnrichedStore::new())).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["ok"], json!(true));
    assert_eq!(response["received"], json!(0));
}

#[actix_web::test]
async fn non_post_method_yields_405() {
    prepare_test_env();
    let (status, _) = get_request("/stream/batch", configure_with(MemoryEnrichedStore::new())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

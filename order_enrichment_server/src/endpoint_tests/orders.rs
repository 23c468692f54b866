use actix_web::{http::StatusCode, web, web::ServiceConfig};
use oeg_common::Money;
use order_enrichment_engine::{test_utils::prepare_test_env, traits::StoreError, OrderApi};
use serde_json::json;
use uuid::Uuid;

use super::{
    helpers::{get_request, post_raw, post_request},
    mocks::{stored_order, MockOrderStoreBackend},
};
use crate::routes::NewOrderRoute;

fn configure_accepting_store(cfg: &mut ServiceConfig) {
    let mut store = MockOrderStoreBackend::new();
    store.expect_put_order().returning(|order| Ok((stored_order(order), true)));
    cfg.service(NewOrderRoute::<MockOrderStoreBackend>::new()).app_data(web::Data::new(OrderApi::new(store)));
}

fn configure_untouched_store(cfg: &mut ServiceConfig) {
    let mut store = MockOrderStoreBackend::new();
    store.expect_put_order().never();
    cfg.service(NewOrderRoute::<MockOrderStoreBackend>::new()).app_data(web::Data::new(OrderApi::new(store)));
}

#[actix_web::test]
async fn create_order_returns_201_with_a_fresh_uuid() {
    prepare_test_env();
    let (status, body) =
        post_request("/orders", json!({"customer": "alice", "amount": "100.00"}), configure_accepting_store).await;
    assert_eq!(status, StatusCode::CREATED);
    let response: serde_json::Value = serde_json::from_str(&body).expect("Response was not JSON");
    assert_eq!(response["ok"], json!(true));
    let order_id = response["order_id"].as_str().expect("order_id missing");
    assert!(Uuid::parse_str(order_id).is_ok(), "{order_id} is not a uuid");
}

#[actix_web::test]
async fn json_number_amounts_are_parsed_without_a_float_detour() {
    prepare_test_env();
    let configure = |cfg: &mut ServiceConfig| {
        let mut store = MockOrderStoreBackend::new();
        // 100.10 has no exact f64 representation; the literal must survive as-is
        store
            .expect_put_order()
            .withf(|order| order.amount.to_string() == "100.10")
            .returning(|order| Ok((stored_order(order), true)));
        cfg.service(NewOrderRoute::<MockOrderStoreBackend>::new()).app_data(web::Data::new(OrderApi::new(store)));
    };
    let (status, _) = post_raw("/orders", r#"{"amount": 100.10}"#, configure).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn missing_customer_defaults_to_anonymous() {
    prepare_test_env();
    let configure = |cfg: &mut ServiceConfig| {
        let mut store = MockOrderStoreBackend::new();
        store
            .expect_put_order()
            .withf(|order| order.customer_id == "anonymous")
            .returning(|order| Ok((stored_order(order), true)));
        cfg.service(NewOrderRoute::<MockOrderStoreBackend>::new()).app_data(web::Data::new(OrderApi::new(store)));
    };
    let (status, _) = post_request("/orders", json!({"amount": "5.00"}), configure).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn missing_amount_defaults_to_zero() {
    prepare_test_env();
    let configure = |cfg: &mut ServiceConfig| {
        let mut store = MockOrderStoreBackend::new();
        store
            .expect_put_order()
            .withf(|order| order.amount == Money::ZERO)
            .returning(|order| Ok((stored_order(order), true)));
        cfg.service(NewOrderRoute::<MockOrderStoreBackend>::new()).app_data(web::Data::new(OrderApi::new(store)));
    };
    let (status, _) = post_request("/orders", json!({"customer": "bob"}), configure).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_web::test]
async fn malformed_amount_yields_400_and_no_write() {
    prepare_test_env();
    let (status, body) =
        post_request("/orders", json!({"amount": "not-a-number"}), configure_untouched_store).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid amount"), "unexpected body: {body}");
}

#[actix_web::test]
async fn non_scalar_amount_yields_400() {
    prepare_test_env();
    let (status, _) = post_request("/orders", json!({"amount": ["1.00"]}), configure_untouched_store).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn non_post_method_yields_405() {
    prepare_test_env();
    let (status, _) = get_request("/orders", configure_untouched_store).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn a_store_failure_yields_500() {
    prepare_test_env();
    let configure = |cfg: &mut ServiceConfig| {
        let mut store = MockOrderStoreBackend::new();
        store.expect_put_order().returning(|_| Err(StoreError::DatabaseError("no connection".to_string())));
        cfg.service(NewOrderRoute::<MockOrderStoreBackend>::new()).app_data(web::Data::new(OrderApi::new(store)));
    };
    let (status, body) = post_request("/orders", json!({"amount": "1.00"}), configure).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("backend"), "unexpected body: {body}");
}

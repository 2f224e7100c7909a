//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{CustomerId, MenuItemId, RestaurantId};
use domain::{CartStore, Money, NewCartItem};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let state = api::create_default_state();
    api::create_app(state, get_metrics_handle())
}

fn setup_with_state() -> (axum::Router, Arc<api::routes::orders::AppState>) {
    let state = api::create_default_state();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn seed_cart_item(
    state: &api::routes::orders::AppState,
    customer_id: CustomerId,
    restaurant_id: RestaurantId,
    name: &str,
    quantity: u32,
    cents: i64,
) {
    state
        .cart
        .add_item(
            customer_id,
            NewCartItem {
                menu_item_id: MenuItemId::new(),
                restaurant_id,
                restaurant_name: name.to_string(),
                quantity,
                unit_price: Money::from_cents(cents),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();
    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_add_and_get_cart() {
    let app = setup();
    let customer_id = CustomerId::new();

    let (status, item) = send_json(
        &app,
        "POST",
        &format!("/cart/{customer_id}/items"),
        serde_json::json!({
            "menu_item_id": uuid::Uuid::new_v4(),
            "restaurant_id": uuid::Uuid::new_v4(),
            "restaurant_name": "Trattoria",
            "quantity": 2,
            "unit_price_cents": 950
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["line_total_cents"], 1900);

    let (status, cart) = get_json(&app, &format!("/cart/{customer_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["total_cents"], 1900);
}

#[tokio::test]
async fn test_add_rejects_zero_quantity() {
    let app = setup();
    let customer_id = CustomerId::new();

    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/cart/{customer_id}/items"),
        serde_json::json!({
            "menu_item_id": uuid::Uuid::new_v4(),
            "restaurant_id": uuid::Uuid::new_v4(),
            "restaurant_name": "Trattoria",
            "quantity": 0,
            "unit_price_cents": 950
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("quantity"));
}

#[tokio::test]
async fn test_update_and_remove_cart_item() {
    let app = setup();
    let customer_id = CustomerId::new();

    let (_, item) = send_json(
        &app,
        "POST",
        &format!("/cart/{customer_id}/items"),
        serde_json::json!({
            "menu_item_id": uuid::Uuid::new_v4(),
            "restaurant_id": uuid::Uuid::new_v4(),
            "restaurant_name": "Trattoria",
            "quantity": 1,
            "unit_price_cents": 950
        }),
    )
    .await;
    let item_id = item["id"].as_str().unwrap().to_string();

    let (status, updated) = send_json(
        &app,
        "PATCH",
        &format!("/cart/{customer_id}/items/{item_id}"),
        serde_json::json!({ "quantity": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["quantity"], 4);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/cart/{customer_id}/items/{item_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Removing it again is a 404.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/cart/{customer_id}/items/{item_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_address_lifecycle() {
    let app = setup();
    let customer_id = CustomerId::new();

    let (status, first) = send_json(
        &app,
        "POST",
        &format!("/addresses/{customer_id}"),
        serde_json::json!({ "label": "Home", "address_line": "1 Main St" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["is_default"], true);

    let (_, second) = send_json(
        &app,
        "POST",
        &format!("/addresses/{customer_id}"),
        serde_json::json!({ "address_line": "2 Side St" }),
    )
    .await;
    assert_eq!(second["is_default"], false);
    let second_id = second["id"].as_str().unwrap().to_string();

    // Promote the second address.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/addresses/{customer_id}/{second_id}/default"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (_, list) = get_json(&app, &format!("/addresses/{customer_id}")).await;
    assert_eq!(list["default_address_id"], second_id.as_str());
    assert_eq!(list["addresses"].as_array().unwrap().len(), 2);

    // Delete the first; the second (and only) one can then not be deleted.
    let first_id = first["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/addresses/{customer_id}/{first_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/addresses/{customer_id}/{second_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_checkout_total_success() {
    let (app, state) = setup_with_state();
    let customer_id = CustomerId::new();
    let a = RestaurantId::new();
    let b = RestaurantId::new();

    seed_cart_item(&state, customer_id, a, "Restaurant A", 2, 1000).await;
    seed_cart_item(&state, customer_id, b, "Restaurant B", 1, 2500).await;

    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/checkout/{customer_id}"),
        serde_json::json!({
            "phone": "555-0100",
            "new_address_line": "1 Main St",
            "payment_method": "cash"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["classification"], "TotalSuccess");
    assert_eq!(json["step"], "Confirmation");
    assert_eq!(json["successful_order_ids"].as_array().unwrap().len(), 2);
    assert!(json["failed_orders"].as_array().unwrap().is_empty());
    assert_eq!(json["ordered_items"].as_array().unwrap().len(), 2);

    // The cart is empty afterwards.
    let (_, cart) = get_json(&app, &format!("/cart/{customer_id}")).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_partial_failure() {
    let (app, state) = setup_with_state();
    let customer_id = CustomerId::new();
    let a = RestaurantId::new();
    let b = RestaurantId::new();

    seed_cart_item(&state, customer_id, a, "Restaurant A", 2, 1000).await;
    seed_cart_item(&state, customer_id, b, "Restaurant B", 1, 2500).await;
    state.ordering.set_fail_for(b, "kitchen closed");

    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/checkout/{customer_id}"),
        serde_json::json!({
            "phone": "555-0100",
            "new_address_line": "1 Main St",
            "payment_method": "cash"
        }),
    )
    .await;

    // A settled dispatch is a 200; failures are payload.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["classification"], "PartialSuccess");
    assert_eq!(json["successful_order_ids"].as_array().unwrap().len(), 1);
    assert_eq!(json["failed_orders"][0]["restaurant_name"], "Restaurant B");
    assert_eq!(json["failed_orders"][0]["error"], "kitchen closed");

    // Only the failed restaurant's item remains.
    let (_, cart) = get_json(&app, &format!("/cart/{customer_id}")).await;
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["restaurant_name"], "Restaurant B");
}

#[tokio::test]
async fn test_checkout_total_failure_keeps_cart() {
    let (app, state) = setup_with_state();
    let customer_id = CustomerId::new();
    let a = RestaurantId::new();

    seed_cart_item(&state, customer_id, a, "Restaurant A", 1, 1000).await;
    state.ordering.set_fail_for(a, "unreachable");

    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/checkout/{customer_id}"),
        serde_json::json!({
            "phone": "555-0100",
            "new_address_line": "1 Main St",
            "payment_method": "cash"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["classification"], "TotalFailure");
    assert_eq!(json["step"], "Payment");

    let (_, cart) = get_json(&app, &format!("/cart/{customer_id}")).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_checkout_empty_cart_rejected() {
    let app = setup();
    let customer_id = CustomerId::new();

    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/checkout/{customer_id}"),
        serde_json::json!({
            "phone": "555-0100",
            "new_address_line": "1 Main St",
            "payment_method": "cash"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_checkout_without_address_rejected() {
    let (app, state) = setup_with_state();
    let customer_id = CustomerId::new();
    seed_cart_item(&state, customer_id, RestaurantId::new(), "Trattoria", 1, 900).await;

    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/checkout/{customer_id}"),
        serde_json::json!({
            "phone": "555-0100",
            "payment_method": "cash"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("address"));

    // Nothing was dispatched.
    assert_eq!(state.ordering.order_count(), 0);
}

#[tokio::test]
async fn test_checkout_invalid_customer_id() {
    let app = setup();

    let (status, _) = send_json(
        &app,
        "POST",
        "/checkout/not-a-uuid",
        serde_json::json!({
            "phone": "555-0100",
            "new_address_line": "1 Main St",
            "payment_method": "cash"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

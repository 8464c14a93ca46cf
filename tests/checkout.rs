mod common;

use bawk_storefront::cart::Cart;
use bawk_storefront::checkout::Checkout;
use bawk_storefront::error::ErrorKind;
use bawk_storefront::models::{Product, RowId};
use serde_json::json;
use wiremock::matchers::{any, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::storefront;

fn tee() -> Product {
    serde_json::from_value(json!({
        "id": 1, "name": "Tee", "price": 10.0, "stock": 5, "category": 7,
        "image_url": "https://cdn/products/1.png"
    }))
    .unwrap()
}

fn cap() -> Product {
    serde_json::from_value(json!({ "id": 2, "name": "Cap", "price": 2.5, "stock": 9 })).unwrap()
}

#[tokio::test]
async fn test_place_order_inserts_pending_order() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .and(body_string_contains(r#""status":"Pending""#))
        .and(body_string_contains(r#""total_amount":"25.00""#))
        .and(body_string_contains(r#""email":"ada@example.com""#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 42,
            "email": "ada@example.com",
            "status": "Pending",
            "total_amount": "25.00",
            "items": [
                { "id": 1, "name": "Tee", "price": 10.0, "quantity": 2 },
                { "id": 2, "name": "Cap", "price": 2.5, "quantity": 2 }
            ],
            "created_at": "2024-05-03T09:00:00+00:00"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let checkout = Checkout::new(storefront(&mock_server));
    let mut cart = Cart::new();
    cart.add(&tee(), 2);
    cart.add(&cap(), 2);

    let order = checkout.place_order(&mut cart, "ada@example.com").await.unwrap();
    assert_eq!(order.id, RowId::from(42));
    assert!(order.is_pending());
    assert_eq!(order.total(), 25.0);
    assert_eq!(order.items.len(), 2);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_failed_order_keeps_cart() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let checkout = Checkout::new(storefront(&mock_server));
    let mut cart = Cart::new();
    cart.add(&tee(), 1);

    let err = checkout
        .place_order(&mut cart, "ada@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn test_empty_cart_or_email_is_rejected_locally() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let checkout = Checkout::new(storefront(&mock_server));
    let mut cart = Cart::new();
    let err = checkout
        .place_order(&mut cart, "ada@example.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    cart.add(&cap(), 1);
    let err = checkout.place_order(&mut cart, "  ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(cart.item_count(), 1);
}

#[tokio::test]
async fn test_track_order() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .and(query_param("id", "eq.42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 42, "email": "ada@example.com", "status": "Completed", "total_amount": "25.00" }
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/orders"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let checkout = Checkout::new(storefront(&mock_server));
    let order = checkout.track_order(&RowId::from(42)).await.unwrap();
    assert_eq!(order.status, "Completed");

    let err = checkout.track_order(&RowId::from(7)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

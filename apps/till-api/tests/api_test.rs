use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use till_api::{build_router, AppState};
use till_db::{Database, DbConfig, MemoryStore};

fn app() -> Router {
    build_router(AppState::new(MemoryStore::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_item(app: &Router, name: &str, price: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/item",
        Some(json!({ "name": name, "price": price })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

async fn create_order(app: &Router) -> i64 {
    let (status, body) = send(app, Method::POST, "/order", None).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn full_order_flow() {
    let app = app();
    let item_id = create_item(&app, "itemName", "10.00").await;
    let order_id = create_order(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/addItem/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "itemName");
    assert_eq!(body["items"][0]["price"], "10.00");
    assert_eq!(body["items"][0]["quantity"], 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/addItem/{item_id}/quantity/22"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["quantity"], 23);
    assert_eq!(body["total"], "230.00");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/pay"),
        Some(json!("300.00")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["paid"], true);
    assert_eq!(body["change"], "70.00");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/order/{order_id}/receipt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment"], "300.00");
    assert_eq!(body["change"], "70.00");

    let (_, orders) = send(&app, Method::GET, "/order", None).await;
    assert_eq!(orders[0]["paid"], true);
}

#[tokio::test]
async fn invalid_items_are_bad_requests() {
    let app = app();

    let cases = [
        (json!(null), "item must be provided"),
        (json!({ "price": "1.00" }), "item name must be provided"),
        (json!({ "name": "", "price": "1.00" }), "item name must be provided"),
        (json!({ "name": "Burger" }), "item price must be provided"),
        (json!({ "name": "Burger", "price": "-0.01" }), "item price cannot be negative"),
    ];

    for (body, message) in cases {
        let (status, response) = send(&app, Method::POST, "/item", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], message);
    }

    let (_, items) = send(&app, Method::GET, "/item", None).await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn update_price() {
    let app = app();
    let item_id = create_item(&app, "itemName", "10.00").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/item/{item_id}/price"),
        Some(json!("12.50")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "12.50");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/item/{item_id}/price"),
        Some(json!("-1.00")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "item price cannot be negative");

    let (_, items) = send(&app, Method::GET, "/item", None).await;
    assert_eq!(items[0]["price"], "12.50");

    let (status, _) = send(&app, Method::PUT, "/item/999/price", Some(json!("1.00"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn insufficient_payment() {
    let app = app();
    let item_id = create_item(&app, "itemName", "10.01").await;
    let order_id = create_order(&app).await;
    send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/addItem/{item_id}"),
        None,
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/pay"),
        Some(json!("10.00")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "insufficient payment");
    assert_eq!(body["code"], "INSUFFICIENT_PAYMENT");

    let (_, orders) = send(&app, Method::GET, "/order", None).await;
    assert_eq!(orders[0]["paid"], false);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/order/{order_id}/receipt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn not_found_and_conflict() {
    let app = app();
    let item_id = create_item(&app, "itemName", "0").await;
    let order_id = create_order(&app).await;

    let (status, _) = send(&app, Method::PUT, &format!("/order/404/addItem/{item_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PUT, &format!("/order/{order_id}/addItem/404"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PUT, "/order/404/pay", Some(json!("1.00"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/addItem/{item_id}/quantity/0"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "quantity must be at least 1");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/pay"),
        Some(json!("0")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/addItem/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ORDER_ALREADY_PAID");
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn missing_price_update_is_a_validation_error() {
    let app = app();
    let item_id = create_item(&app, "itemName", "10.00").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/item/{item_id}/price"),
        Some(Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "item price must be provided");

    let (_, items) = send(&app, Method::GET, "/item", None).await;
    assert_eq!(items[0]["price"], "10.00");
}

#[tokio::test]
async fn unreadable_bodies_use_the_error_shape() {
    let app = app();
    let item_id = create_item(&app, "itemName", "10.00").await;
    let order_id = create_order(&app).await;

    let cases = [
        (format!("/item/{item_id}/price"), "\"ten\""),
        (format!("/item/{item_id}/price"), "{\"price\": 1}"),
        (format!("/order/{order_id}/pay"), "null"),
        (format!("/order/{order_id}/pay"), "\"ten\""),
    ];
    for (uri, body) in cases {
        let (status, response) = send_raw(&app, Method::PUT, &uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}");
        assert_eq!(response["code"], "VALIDATION_ERROR");
        assert!(response["error"].is_string());
    }

    let (status, response) = send_raw(&app, Method::POST, "/item", "{\"name\": \"Bur").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_ERROR");

    let (_, orders) = send(&app, Method::GET, "/order", None).await;
    assert_eq!(orders[0]["paid"], false);
    let (_, items) = send(&app, Method::GET, "/item", None).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn quantity_that_overflows_the_total_is_rejected() {
    let app = app();
    let item_id = create_item(&app, "big", "100000000000000000000").await;
    let order_id = create_order(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/addItem/{item_id}/quantity/1000000000"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "quantity is too large");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/pay"),
        Some(json!("0")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["change"], "0.00");
}

#[tokio::test]
async fn sqlite_backed_router() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = build_router(AppState::new(db));

    let item_id = create_item(&app, "itemName", "9.99").await;
    let order_id = create_order(&app).await;
    send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/addItem/{item_id}/quantity/2"),
        None,
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/order/{order_id}/pay"),
        Some(json!("20.00")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["change"], "0.02");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
}

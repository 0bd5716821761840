//! Storefront router tests: cart fragments end to end over HTTP, product
//! pages against a mock content store.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kilnworks_integration_tests::{product_document_json, storefront_config};
use kilnworks_storefront::cart::MemoryCartStorage;
use kilnworks_storefront::routes;
use kilnworks_storefront::state::AppState;

const QUERY_PATH: &str = "/data/query/test";

/// Build a router with an in-memory cart, pointed at the given content
/// store URL.
fn app(content_api: &str) -> Router {
    let state = AppState::new(storefront_config(content_api), Box::new(MemoryCartStorage::new()))
        .expect("app state should build");
    routes::routes().with_state(state)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.clone().oneshot(request).await.expect("router should respond")
}

async fn post_form(app: &Router, uri: &str, form: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request should build");
    app.clone().oneshot(request).await.expect("router should respond")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn test_add_to_cart_returns_count_and_trigger_header() {
    let app = app("http://content.test");

    let response = post_form(
        &app,
        "/cart/add",
        "id=prod-1&name=Dune%20Vase&price=85&quantity=2&image=image-1",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("HX-Trigger")
            .and_then(|value| value.to_str().ok()),
        Some("cart-updated"),
        "cart mutations must announce themselves to the page"
    );
    assert_eq!(json_body(response).await, json!({ "count": 2 }));

    let cart = json_body(get(&app, "/cart").await).await;
    assert_eq!(cart["item_count"], 2);
    assert_eq!(cart["subtotal"], "$170.00");
    assert_eq!(cart["items"][0]["name"], "Dune Vase");
    assert_eq!(cart["items"][0]["line_price"], "$170.00");
}

#[tokio::test]
async fn test_adding_same_product_merges_quantity_and_keeps_first_snapshot() {
    let app = app("http://content.test");

    post_form(&app, "/cart/add", "id=prod-1&name=Dune%20Vase&price=85&quantity=2").await;
    let response =
        post_form(&app, "/cart/add", "id=prod-1&name=Renamed&price=10&quantity=3").await;
    assert_eq!(json_body(response).await, json!({ "count": 5 }));

    let cart = json_body(get(&app, "/cart").await).await;
    let items = cart["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1, "same id must merge, not duplicate");
    assert_eq!(items[0]["name"], "Dune Vase", "the first snapshot's fields win");
    assert_eq!(items[0]["price"], "$85.00");
    assert_eq!(items[0]["quantity"], 5);
    assert_eq!(cart["subtotal"], "$425.00");
}

#[tokio::test]
async fn test_quantity_is_normalized_never_rejected() {
    let app = app("http://content.test");

    let response = post_form(&app, "/cart/add", "id=a&name=One&price=10").await;
    assert_eq!(json_body(response).await, json!({ "count": 1 }), "missing quantity adds one");

    let response = post_form(&app, "/cart/add", "id=b&name=Two&price=10&quantity=0").await;
    assert_eq!(json_body(response).await, json!({ "count": 2 }), "zero becomes one");

    let response = post_form(&app, "/cart/add", "id=c&name=Three&price=10&quantity=-4").await;
    assert_eq!(json_body(response).await, json!({ "count": 3 }), "negative becomes one");
}

#[tokio::test]
async fn test_remove_deletes_whole_line_and_unknown_id_is_noop() {
    let app = app("http://content.test");

    post_form(&app, "/cart/add", "id=prod-1&name=Dune%20Vase&price=85&quantity=2").await;
    post_form(&app, "/cart/add", "id=prod-2&name=Ash%20Bowl&price=24.5&quantity=1").await;

    let response = post_form(&app, "/cart/remove", "id=prod-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let cart = json_body(response).await;
    assert_eq!(
        cart["items"].as_array().map(Vec::len),
        Some(1),
        "remove drops the whole line regardless of quantity"
    );
    assert_eq!(cart["subtotal"], "$24.50");

    let response = post_form(&app, "/cart/remove", "id=never-added").await;
    assert_eq!(response.status(), StatusCode::OK);
    let cart = json_body(response).await;
    assert_eq!(cart["item_count"], 1, "an unknown id leaves the cart untouched");
}

#[tokio::test]
async fn test_cart_count_sums_quantities_across_lines() {
    let app = app("http://content.test");

    let response = get(&app, "/cart/count").await;
    assert_eq!(json_body(response).await, json!({ "count": 0 }));

    post_form(&app, "/cart/add", "id=prod-1&name=Vase&price=85&quantity=2").await;
    post_form(&app, "/cart/add", "id=prod-2&name=Bowl&price=24.5&quantity=3").await;

    let response = get(&app, "/cart/count").await;
    assert_eq!(json_body(response).await, json!({ "count": 5 }));
}

#[tokio::test]
async fn test_product_listing_renders_store_documents() {
    let content = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("query", r#"*[_type == "product"] | order(name asc)"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                product_document_json("prod-1", "Ash Bowl"),
                product_document_json("prod-2", "Dune Vase"),
            ]
        })))
        .expect(1)
        .mount(&content)
        .await;

    let app = app(&content.uri());
    let response = get(&app, "/products").await;
    assert_eq!(response.status(), StatusCode::OK);

    let products = json_body(response).await;
    let listing = products.as_array().expect("listing array");
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0]["name"], "Ash Bowl");
    assert_eq!(listing[0]["price"], "$85.00");
    assert_eq!(listing[0]["image"], "image-1", "views expose the hosted asset reference");
}

#[tokio::test]
async fn test_product_detail_found_and_missing() {
    let content = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$id", "\"prod-1\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": product_document_json("prod-1", "Dune Vase")
        })))
        .mount(&content)
        .await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("$id", "\"prod-404\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&content)
        .await;

    let app = app(&content.uri());

    let response = get(&app, "/products/prod-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let product = json_body(response).await;
    assert_eq!(product["id"], "prod-1");
    assert_eq!(product["category"], "category-ceramics");

    let response = get(&app, "/products/prod-404").await;
    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "a missing document maps to 404, not a 5xx"
    );
}

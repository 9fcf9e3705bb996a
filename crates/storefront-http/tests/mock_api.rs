//! Mock API tests for the storefront client.
//!
//! These tests use wiremock to stand in for the storefront API and exercise
//! the client over real HTTP with the reqwest transport.

use serde_json::json;
use storefront_core::error::AuthError;
use storefront_core::resources::{CategoryInput, OrderLine, Registration};
use storefront_core::{AccessToken, ApiUrl, Credentials, Error, Method, Role};
use storefront_http::{ApiClient, AuthEndpoints, AuthStatus, ClientConfig, RequestOptions};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let url = ApiUrl::new(&server.uri()).unwrap();
    ApiClient::new(ClientConfig::new(url)).unwrap()
}

async fn mount_login(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/login_check"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refresh_token=r1; Path=/; HttpOnly")
                .set_body_json(body),
        )
        .mount(server)
        .await;
}

// ============================================================================
// Session endpoints
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login_check"))
        .and(body_json(json!({
            "username": "alice@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "access-1",
            "roles": ["ROLE_ADMIN", "ROLE_USER"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let identity = client
        .login(&Credentials::new("alice@example.com", "secret123"))
        .await
        .unwrap();

    assert_eq!(identity.username.as_deref(), Some("alice@example.com"));
    assert_eq!(identity.role(), Role::Admin);
    assert!(client.is_authenticated());
    assert_eq!(client.role(), Some(Role::Admin));
    assert_eq!(client.export_access_token().unwrap().as_str(), "access-1");
    assert!(matches!(client.status(), AuthStatus::SignedIn(Some(_))));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login_check"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "message": "Invalid credentials."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .login(&Credentials::new("alice@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_nested_login_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login_check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "access-1",
            "user": {"id": 5, "username": "bob", "email": "bob@example.com", "roles": ["ROLE_USER"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = ApiUrl::new(&server.uri()).unwrap();
    let client =
        ApiClient::new(ClientConfig::new(url).with_endpoints(AuthEndpoints::nested())).unwrap();
    let identity = client
        .login(&Credentials::new("bob", "pw"))
        .await
        .unwrap();

    assert_eq!(identity.id, Some(5));
    assert_eq!(identity.role(), Role::User);
}

#[tokio::test]
async fn test_refresh_sends_session_cookie() {
    let server = MockServer::start().await;
    mount_login(&server, json!({"token": "access-1", "roles": ["ROLE_USER"]})).await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh"))
        .and(header("cookie", "refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .login(&Credentials::new("alice@example.com", "pw"))
        .await
        .unwrap();
    client.refresh().await.unwrap();

    assert_eq!(client.export_access_token().unwrap().as_str(), "access-2");
    // Refresh without a user keeps the identity from login.
    assert_eq!(client.role(), Some(Role::User));
}

#[tokio::test]
async fn test_register_opens_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_json(json!({
            "email": "carol@example.com",
            "password": "pw",
            "first_name": "Carol",
            "last_name": "Doe"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "accessToken": "access-1",
            "user": {"id": 9, "name": "Carol", "role": "ROLE_USER"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let identity = client
        .register(&Registration {
            email: "carol@example.com".into(),
            password: "pw".into(),
            first_name: "Carol".into(),
            last_name: "Doe".into(),
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(identity.id, Some(9));
    assert_eq!(identity.email.as_deref(), Some("carol@example.com"));
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_credential() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.restore(AccessToken::new("access-1"), None);
    client.logout().await.unwrap();

    assert!(!client.is_authenticated());
    assert_eq!(client.status(), AuthStatus::SignedOut);
}

#[tokio::test]
async fn test_logout_clears_credential_when_server_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.restore(AccessToken::new("access-1"), None);
    let err = client.logout().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(!client.is_authenticated());
}

// ============================================================================
// Refresh wave over HTTP
// ============================================================================

#[tokio::test]
async fn test_stale_token_wave() {
    let server = MockServer::start().await;

    Mock::given(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "message": "Expired JWT Token"
        })))
        .mount(&server)
        .await;

    Mock::given(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.restore(AccessToken::new("stale"), None);

    let (orders, categories, item) = tokio::join!(
        client.request(Method::Get, "/api/orders/user/5", None, RequestOptions::default()),
        client.request(Method::Get, "/api/categories", None, RequestOptions::default()),
        client.request(
            Method::Patch,
            "/api/orders/items/9",
            Some(json!({"quantity": 2})),
            RequestOptions::default()
        ),
    );

    assert_eq!(orders.unwrap().status, 200);
    assert_eq!(categories.unwrap().status, 200);
    assert_eq!(item.unwrap().status, 200);
    assert!(!client.refresh_in_flight());
}

#[tokio::test]
async fn test_rejected_refresh_expires_session() {
    let server = MockServer::start().await;

    Mock::given(path("/api/categories"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "message": "Missing refresh token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.restore(AccessToken::new("stale"), None);

    let err = client
        .request(Method::Get, "/api/categories", None, RequestOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Missing refresh token"));
    assert_eq!(client.status(), AuthStatus::Expired);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let url = ApiUrl::new("http://127.0.0.1:9").unwrap();
    let client = ApiClient::new(ClientConfig::new(url)).unwrap();

    let err = client
        .request(Method::Get, "/api/categories", None, RequestOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_network());
}

// ============================================================================
// Resources
// ============================================================================

#[tokio::test]
async fn test_products_list_with_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "page": 1,
            "data": [{"id": 1, "name": "Mug", "price": 9.5, "stock": 4}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let listing = client.products().list(Some(3)).await.unwrap();

    assert_eq!(listing.data.len(), 1);
    assert_eq!(listing.data[0].name, "Mug");
}

#[tokio::test]
async fn test_products_search_encodes_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/search"))
        .and(query_param("q", "blue mug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "results": [{"id": 2, "name": "Blue mug", "price": 11.0}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = client.products().search("blue mug").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
}

#[tokio::test]
async fn test_product_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "message": "Product not found"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.products().get(404).await.unwrap_err();

    match err {
        Error::Protocol(p) => {
            assert_eq!(p.status, 404);
            assert_eq!(p.message.as_deref(), Some("Product not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_category_create() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .and(header("authorization", "Bearer admin"))
        .and(body_json(json!({
            "name": "Kitchen",
            "description": "Pots and pans",
            "slug": "kitchen"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "category": {"id": 3, "name": "Kitchen", "slug": "kitchen", "description": "Pots and pans"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.restore(AccessToken::new("admin"), None);
    let created = client
        .categories()
        .create(&CategoryInput {
            name: "Kitchen".into(),
            description: "Pots and pans".into(),
            slug: "kitchen".into(),
        })
        .await
        .unwrap();

    assert_eq!(created.category.id, 3);
}

#[tokio::test]
async fn test_order_flow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(json!({"user_id": 5, "product_id": 2, "quantity": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "order_id": 12,
            "customer_email": "alice@example.com",
            "status": "wait to pay",
            "total_amount": 19.0,
            "total_quantity": 1,
            "items": [{
                "item_id": 9, "product_id": 2, "product_name": "Tee",
                "quantity": 1, "unit_price": 19.0, "total_price": 19.0,
                "images": [{"url": "https://cdn/tee.png"}]
            }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/orders/items/9"))
        .and(body_json(json!({"quantity": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/orders/12"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.restore(AccessToken::new("user"), None);
    let orders = client.orders();

    let order = orders
        .create(OrderLine {
            user_id: 5,
            product_id: 2,
            quantity: 1,
        })
        .await
        .unwrap();
    assert_eq!(order.items[0].item_id, 9);

    orders.update_item_quantity(9, 3).await.unwrap();
    orders.clear(order.order_id).await.unwrap();
}

#[tokio::test]
async fn test_users_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "email": "root@example.com", "username": "root",
             "firstName": "Ro", "lastName": "Ot", "roles": ["ROLE_ADMIN"]}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.restore(AccessToken::new("admin"), None);
    let users = client.users().list().await.unwrap();

    assert_eq!(users[0].role(), Role::Admin);
    assert_eq!(users[0].first_name.as_deref(), Some("Ro"));
}

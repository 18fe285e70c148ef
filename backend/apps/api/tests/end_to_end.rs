//! End-to-end tests against the composed router
//!
//! In-memory repositories and cache; requests go through `oneshot`.

use std::time::Duration;

use api::{AppServices, build_app};
use auth::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};
use auth::domain::{User, UserRepository};
use auth::{AuthAppState, AuthConfig, InMemoryUserRepository};
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use catalog::{CatalogAppState, CatalogConfig, InMemoryProductRepository};
use platform::cache::CacheClient;
use platform::password::{ClearTextPassword, CredentialHasher};
use platform::rate_limit::RateLimitConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@x.com";
const ADMIN_PASSWORD: &str = "Admin123!";

struct TestApp {
    router: Router,
    users: InMemoryUserRepository,
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

fn test_app() -> TestApp {
    test_app_with(RateLimitConfig::new(1_000, Duration::from_secs(60)))
}

fn test_app_with(rate_limit: RateLimitConfig) -> TestApp {
    let cache = CacheClient::memory();
    let users = InMemoryUserRepository::new();

    let auth_config = AuthConfig {
        hash_cost: 1,
        ..AuthConfig::new("end-to-end-test-secret")
    };
    let auth = AuthAppState::new(users.clone(), cache.clone(), auth_config).unwrap();
    let catalog = CatalogAppState::new(
        InMemoryProductRepository::new(),
        cache.clone(),
        auth.tokens.clone(),
        CatalogConfig::default(),
    );

    let router = build_app(AppServices {
        auth,
        catalog,
        cache,
        database: None,
        rate_limit,
        environment: "test".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
    });

    TestApp { router, users }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        Reply {
            status,
            headers,
            body,
        }
    }

    async fn register(&self, email: &str, password: &str) -> Reply {
        self.send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": email, "password": password, "name": "Alice" })),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Reply {
        self.send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Administrators cannot self-register; insert one directly, then log in.
    async fn admin_token(&self) -> String {
        let hash = CredentialHasher::new(1)
            .unwrap()
            .hash(&ClearTextPassword::new(ADMIN_PASSWORD))
            .unwrap();
        let admin = User::new(
            Email::new(ADMIN_EMAIL).unwrap(),
            UserName::new("Admin").unwrap(),
            UserRole::Admin,
            hash,
        );
        self.users.create(&admin).await.unwrap();

        let reply = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(reply.status, StatusCode::OK);
        token_of(&reply)
    }

    async fn create_product(&self, token: Option<&str>, sku: &str) -> Reply {
        self.send(
            Method::POST,
            "/api/v1/products",
            token,
            Some(json!({
                "name": "Laptop",
                "description": "A portable computer",
                "price": 999.99,
                "quantity": 5,
                "sku": sku,
                "category": "Electronics"
            })),
        )
        .await
    }
}

fn token_of(reply: &Reply) -> String {
    reply.body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_and_catalog_scenario() {
    let app = test_app();

    let registered = app.register("a@x.com", "Password1!").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.body["message"], "Registration successful");
    assert_eq!(registered.body["user"]["email"], "a@x.com");
    assert_eq!(registered.body["user"]["role"], "USER");
    assert!(registered.body["user"].get("password").is_none());
    let user_token = token_of(&registered);

    let wrong_password = app.login("a@x.com", "Wrong123!").await;
    let unknown_email = app.login("nobody@x.com", "Wrong123!").await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["message"], "Invalid email or password");

    let forbidden = app.create_product(Some(&user_token), "SKU-1").await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let admin_token = app.admin_token().await;
    let created = app.create_product(Some(&admin_token), "SKU-1").await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["product"]["sku"], "SKU-1");
    assert_eq!(created.body["product"]["price"], "999.99");
    assert_eq!(created.body["product"]["isActive"], true);

    let duplicate = app.create_product(Some(&admin_token), "SKU-1").await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let listed = app
        .send(Method::GET, "/api/v1/products?search=SKU-1", None, None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["products"].as_array().unwrap().len(), 1);
    assert_eq!(listed.body["pagination"]["totalCount"], 1);
    assert_eq!(listed.body["pagination"]["hasNextPage"], false);
}

#[tokio::test]
async fn test_unauthenticated_is_401_not_403() {
    let app = test_app();

    let reply = app.create_product(None, "SKU-1").await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["error"], "Unauthorized");

    let reply = app
        .send(Method::GET, "/api/v1/products/stats/overview", Some("garbage"), None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_self_registration_rejected() {
    let app = test_app();
    let reply = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "sneaky@x.com",
                "password": "Password1!",
                "name": "Sneaky",
                "role": "ADMIN"
            })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_validation_collects_every_field() {
    let app = test_app();
    let reply = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "short", "unknown": 1 })),
        )
        .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"], "Validation Error");
    let fields: Vec<&str> = reply.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"name"));
}

#[tokio::test]
async fn test_malformed_json_and_bad_ids() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let reply = app
        .send(Method::GET, "/api/v1/products/not-a-uuid", None, None)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"][0]["field"], "id");

    let reply = app
        .send(Method::GET, "/api/v1/products?limit=500&sortBy=sku", None, None)
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_profile_flow() {
    let app = test_app();
    let token = token_of(&app.register("a@x.com", "Password1!").await);

    let profile = app
        .send(Method::GET, "/api/v1/auth/profile", Some(&token), None)
        .await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["user"]["name"], "Alice");
    assert!(profile.body["user"]["updatedAt"].is_string());

    let updated = app
        .send(
            Method::PUT,
            "/api/v1/auth/profile",
            Some(&token),
            Some(json!({ "name": "Alice Martin" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["user"]["name"], "Alice Martin");

    let changed = app
        .send(
            Method::PUT,
            "/api/v1/auth/change-password",
            Some(&token),
            Some(json!({
                "currentPassword": "Password1!",
                "newPassword": "Changed9$",
                "confirmPassword": "Changed9$"
            })),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);
    assert_eq!(app.login("a@x.com", "Password1!").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login("a@x.com", "Changed9$").await.status, StatusCode::OK);

    let logout = app
        .send(Method::POST, "/api/v1/auth/logout", Some(&token), None)
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["message"], "Logout successful");

    let missing = app.send(Method::GET, "/api/v1/auth/profile", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_product_lifecycle() {
    let app = test_app();
    let token = app.admin_token().await;

    let created = app.create_product(Some(&token), "LAP-001").await;
    let id = created.body["product"]["id"].as_str().unwrap().to_string();
    let path = format!("/api/v1/products/{id}");

    let fetched = app.send(Method::GET, &path, None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["product"]["name"], "Laptop");

    let updated = app
        .send(
            Method::PUT,
            &path,
            Some(&token),
            Some(json!({ "price": 12.5, "quantity": 3 })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["product"]["price"], "12.50");

    let refetched = app.send(Method::GET, &path, None, None).await;
    assert_eq!(refetched.body["product"]["quantity"], 3);

    let stats = app
        .send(Method::GET, "/api/v1/products/stats/overview", Some(&token), None)
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["stats"]["totalProducts"], 1);
    assert_eq!(stats.body["stats"]["totalValue"], "12.50");
    assert_eq!(stats.body["stats"]["lowStockProducts"], 1);
    assert_eq!(stats.body["stats"]["categories"][0]["name"], "Electronics");

    let deleted = app.send(Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Product deleted successfully");

    let gone = app.send(Method::GET, &path, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let listed = app.send(Method::GET, "/api/v1/products", None, None).await;
    assert_eq!(listed.body["pagination"]["totalCount"], 0);
}

#[tokio::test]
async fn test_health_descriptor_and_fallback() {
    let app = test_app();

    let health = app.send(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "OK");
    assert_eq!(health.body["environment"], "test");
    assert!(health.body["uptime"].is_number());
    assert!(health.body["timestamp"].is_string());

    let root = app.send(Method::GET, "/", None, None).await;
    assert_eq!(root.body["health"], "/api/v1/health");

    let missing = app.send(Method::GET, "/api/v1/nope", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "Route GET /api/v1/nope not found");
}

#[tokio::test]
async fn test_rate_limit() {
    let app = test_app_with(RateLimitConfig::new(2, Duration::from_secs(60)));

    for _ in 0..2 {
        let reply = app.send(Method::GET, "/api/v1/health", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
    }

    let limited = app.send(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers.contains_key(header::RETRY_AFTER));
    assert_eq!(
        limited.body["message"],
        "Too many requests. Limit: 2 requests per 1m"
    );

    // Not under /api/v1
    let root = app.send(Method::GET, "/", None, None).await;
    assert_eq!(root.status, StatusCode::OK);
}

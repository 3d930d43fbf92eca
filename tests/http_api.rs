//! HTTP-level tests for the router built by `build_app`

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use catalog::app::{AppState, build_app};
use catalog::config::Config;
use catalog::db::{CreateUser, Database};

struct TestServer {
    router: Router,
    state: AppState,
}

impl TestServer {
    async fn new() -> Self {
        let config = Config {
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            jwt_secret: "http-secret".to_string(),
            login_password: "secret".to_string(),
            token_lifetime: 3600,
        };
        let db = Database::connect(&config.database_url, config.database_max_connections)
            .await
            .expect("in-memory database");
        let state = AppState::new(&config, db);
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn graphql(&self, query: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/graphql")
            .header(CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let body = Body::from(json!({ "query": query }).to_string());

        let (status, bytes) = self.send(builder.body(body).unwrap()).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let server = TestServer::new().await;

    let (status, body) = server.send(get("/healthz")).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_readyz_reports_database() {
    let server = TestServer::new().await;

    let (status, body) = server.send(get("/readyz")).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ready": true, "database": true }));
}

#[tokio::test]
async fn test_graphiql_only_for_browsers() {
    let server = TestServer::new().await;

    let (api_status, _) = server.send(get("/graphql")).await;
    let browser = Request::builder()
        .uri("/graphql")
        .header(ACCEPT, "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();
    let (browser_status, page) = server.send(browser).await;

    assert_eq!(api_status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(browser_status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&page).contains("graphiql"));
}

#[tokio::test]
async fn test_post_graphql_anonymous() {
    let server = TestServer::new().await;

    let (status, body) = server.graphql("{ bookCount me { username } }", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "bookCount": 0, "me": null }));
}

#[tokio::test]
async fn test_post_graphql_reads_bearer_header() {
    let server = TestServer::new().await;
    let user = server
        .state
        .db
        .users()
        .create(CreateUser {
            username: "mluukkai".to_string(),
            favorite_genre: None,
        })
        .await
        .unwrap();
    let token = server.state.auth.generate_token(&user).unwrap();

    let (status, body) = server
        .graphql("{ me { username } }", Some(&format!("Bearer {}", token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "me": { "username": "mluukkai" } }));
}

#[tokio::test]
async fn test_post_graphql_rejects_malformed_token() {
    let server = TestServer::new().await;

    let (status, body) = server.graphql("{ bookCount }", Some("Bearer garbage")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
}

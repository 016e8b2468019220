use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use paywall::domain::config::ApiConfig;
use paywall_server::Server;
use serde_json::{Value, json};
use tower::ServiceExt;

/// A browser stand-in: replays the session cookie the server hands out.
struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    async fn new() -> Self {
        Self::with_config(ApiConfig::default()).await
    }

    async fn with_config(config: ApiConfig) -> Self {
        let server = Server::builder().config(config).build().await.expect("server builds");
        Self { app: server.router(), cookie: None }
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_owned();
            self.cookie = if pair.ends_with('=') { None } else { Some(pair) };
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };

        (status, value)
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    async fn login(&mut self, username: &str) -> (StatusCode, Value) {
        self.send(Method::POST, "/login", Some(json!({ "username": username }))).await
    }
}

#[tokio::test]
async fn login_binds_the_session() {
    let mut client = Client::new().await;

    let (status, body) = client.login("zoe").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "username": "zoe" }));
    assert!(client.cookie.is_some());

    let (status, body) = client.get("/check_session").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "username": "zoe" }));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let mut client = Client::new().await;

    let (status, body) = client.login("nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "User not found" }));
    assert!(client.cookie.is_none());
}

#[tokio::test]
async fn missing_or_null_username_is_not_found() {
    let mut client = Client::new().await;

    for payload in [json!({}), json!({ "username": null })] {
        let (status, body) = client.send(Method::POST, "/login", Some(payload)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "User not found" }));
    }
    assert!(client.cookie.is_none());
}

#[tokio::test]
async fn malformed_login_body_is_a_json_error() {
    let client = Client::new().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\":"))
        .unwrap();

    let response = client.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn check_session_without_login_is_unauthorized() {
    let mut client = Client::new().await;

    let (status, body) = client.get("/check_session").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn logout_unbinds_but_keeps_the_counter() {
    let mut client = Client::new().await;
    client.login("maya").await;
    client.get("/articles/1").await;
    client.get("/articles/2").await;

    let (status, body) = client.delete("/logout").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = client.get("/check_session").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = client.get("/articles/3").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = client.get("/articles/4").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn articles_are_listed_without_counting() {
    let mut client = Client::new().await;

    for _ in 0..5 {
        let (status, body) = client.get("/articles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(6));
    }

    let (_, body) = client.get("/articles").await;
    let first = &body[0];
    assert_eq!(first["id"], 1);
    for field in ["author", "title", "content", "preview", "minutes_to_read", "date"] {
        assert!(first.get(field).is_some(), "missing {field}");
    }

    let (status, _) = client.get("/articles/1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn fourth_view_hits_the_paywall() {
    let mut client = Client::new().await;

    for _ in 0..3 {
        let (status, body) = client.get("/articles/5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 5);
        assert_eq!(body["title"], "Small Kitchens, Big Dinners");
    }

    let (status, body) = client.get("/articles/5").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Maximum pageview limit reached" }));
}

#[tokio::test]
async fn missing_article_counts_as_a_view() {
    let mut client = Client::new().await;

    let (status, body) = client.get("/articles/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Article not found" }));

    client.get("/articles/1").await;
    client.get("/articles/2").await;
    let (status, _) = client.get("/articles/3").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn clear_resets_the_paywall() {
    let mut client = Client::new().await;
    client.login("zoe").await;
    for _ in 0..4 {
        client.get("/articles/5").await;
    }

    let (status, _) = client.delete("/clear").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = client.get("/articles/5").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = client.get("/check_session").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn sessions_are_independent_per_client() {
    let mut first = Client::new().await;
    for _ in 0..4 {
        first.get("/articles/2").await;
    }

    let mut second = Client { app: first.app.clone(), cookie: None };
    let (status, _) = second.get("/articles/2").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn quota_follows_configuration() {
    let mut config = ApiConfig::default();
    config.paywall.max_page_views = 1;
    let mut client = Client::with_config(config).await;

    let (status, _) = client.get("/articles/1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = client.get("/articles/1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_up() {
    let mut client = Client::new().await;

    let (status, body) = client.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["sessions"], 0);
}

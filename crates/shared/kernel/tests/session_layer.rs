use axum::Router;
use axum::body::Body;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get};
use paywall_kernel::domain::config::SessionConfig;
use paywall_kernel::server::{Session, SessionStore, session_layer};
use tower::ServiceExt;

async fn hit(session: Session) -> String {
    let views = session.page_views() + 1;
    session.set_page_views(views);
    views.to_string()
}

async fn peek(session: Session) -> String {
    session.page_views().to_string()
}

async fn clear(session: Session) -> StatusCode {
    session.clear();
    StatusCode::NO_CONTENT
}

fn app(store: &SessionStore) -> Router {
    Router::new()
        .route("/hit", get(hit))
        .route("/peek", get(peek))
        .route("/clear", delete(clear))
        .layer(from_fn_with_state(store.clone(), session_layer))
}

async fn call(app: &Router, method: &str, uri: &str, cookie: Option<&str>) -> (StatusCode, Option<String>, String) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(COOKIE, cookie);
    }
    let response = app.clone().oneshot(request.body(Body::empty()).unwrap()).await.unwrap();

    let status = response.status();
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .map(|v| v.to_str().unwrap().split(';').next().unwrap().to_owned());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, set_cookie, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn state_persists_across_requests_carrying_the_cookie() {
    let store = SessionStore::new(&SessionConfig::default(), false);
    let app = app(&store);

    let (_, cookie, body) = call(&app, "GET", "/hit", None).await;
    let cookie = cookie.expect("first write issues a cookie");
    assert_eq!(body, "1");

    let (_, reissued, body) = call(&app, "GET", "/hit", Some(&cookie)).await;
    assert!(reissued.is_none());
    assert_eq!(body, "2");

    let (_, _, body) = call(&app, "GET", "/peek", Some(&cookie)).await;
    assert_eq!(body, "2");
}

#[tokio::test]
async fn reads_alone_do_not_create_sessions() {
    let store = SessionStore::new(&SessionConfig::default(), false);
    let app = app(&store);

    let (status, cookie, body) = call(&app, "GET", "/peek", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookie.is_none());
    assert_eq!(body, "0");
    assert!(store.is_empty());
}

#[tokio::test]
async fn clearing_expires_the_cookie_and_resets_state() {
    let store = SessionStore::new(&SessionConfig::default(), false);
    let app = app(&store);

    let (_, cookie, _) = call(&app, "GET", "/hit", None).await;
    let cookie = cookie.unwrap();

    let (status, expired, _) = call(&app, "DELETE", "/clear", Some(&cookie)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(expired.as_deref(), Some("paywall_session="));

    let (_, _, body) = call(&app, "GET", "/peek", Some(&cookie)).await;
    assert_eq!(body, "0");
}

#[tokio::test]
async fn handlers_without_the_layer_fail_with_500() {
    let app: Router = Router::new().route("/peek", get(peek));
    let response = app.oneshot(Request::get("/peek").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

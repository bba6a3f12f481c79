use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use deena::{
    api::{ApiError, AuthConnector, HttpAuthConnector},
    models::{CredentialPayload, LoginParams},
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

type Seen = Arc<Mutex<Vec<Value>>>;

/// Stand-in for the remote authentication API
async fn spawn_auth_server() -> (String, Seen) {
    let seen = Seen::default();
    let recorded = seen.clone();

    let app = Router::new()
        .route(
            "/api/login/account",
            post(move |Json(body): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push(body.clone());
                    let kind = body["type"].clone();
                    if body["username"] == "admin" && body["password"] == "ant.design" {
                        (
                            StatusCode::OK,
                            [(header::SET_COOKIE, "token=abc123; Path=/")],
                            Json(json!({
                                "status": "ok",
                                "type": kind,
                                "currentAuthority": "admin"
                            })),
                        )
                            .into_response()
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({
                                "status": "error",
                                "type": kind,
                                "currentAuthority": "guest"
                            })),
                        )
                            .into_response()
                    }
                }
            }),
        )
        .route(
            "/api/currentUser",
            get(|headers: HeaderMap| async move {
                let has_token = headers
                    .get(header::COOKIE)
                    .and_then(|c| c.to_str().ok())
                    .map(|c| c.contains("token=abc123"))
                    .unwrap_or(false);
                if has_token {
                    Json(json!({
                        "data": {
                            "name": "Serati Ma",
                            "userid": "00000001",
                            "access": "admin",
                            "group": "UED"
                        },
                        "success": true
                    }))
                    .into_response()
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "data": { "isLogin": false }, "success": true })),
                    )
                        .into_response()
                }
            }),
        )
        .route(
            "/broken/api/login/account",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

fn credentials(username: &str, password: &str) -> CredentialPayload {
    CredentialPayload::Login(LoginParams {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[tokio::test]
async fn test_login_then_current_user_shares_cookie() {
    let (base, seen) = spawn_auth_server().await;
    let connector = HttpAuthConnector::new(&base).unwrap();
    let api = connector.connect().unwrap();

    let result = api.login(&credentials("admin", "ant.design")).await.unwrap();
    assert!(result.is_ok());
    assert_eq!(result.current_authority.as_deref(), Some("admin"));

    let user = api.current_user().await.unwrap().expect("user after login");
    assert_eq!(user.name.as_deref(), Some("Serati Ma"));
    assert_eq!(user.extra.get("group"), Some(&json!("UED")));

    let sent = seen.lock().unwrap();
    assert_eq!(sent[0]["type"], "login");
    assert_eq!(sent[0]["username"], "admin");
}

#[tokio::test]
async fn test_connections_do_not_share_cookies() {
    let (base, _seen) = spawn_auth_server().await;
    let connector = HttpAuthConnector::new(&base).unwrap();

    let first = connector.connect().unwrap();
    first.login(&credentials("admin", "ant.design")).await.unwrap();

    let second = connector.connect().unwrap();
    assert!(second.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejection_with_error_status_is_an_answer() {
    let (base, _seen) = spawn_auth_server().await;
    let api = HttpAuthConnector::new(&base).unwrap().connect().unwrap();

    let result = api.login(&credentials("admin", "wrong")).await.unwrap();

    assert!(!result.is_ok());
    assert_eq!(result.status.as_deref(), Some("error"));
    assert_eq!(result.kind.as_deref(), Some("login"));
}

#[tokio::test]
async fn test_non_json_failure_is_a_transport_error() {
    let (base, _seen) = spawn_auth_server().await;
    let api = HttpAuthConnector::new(&format!("{}/broken", base))
        .unwrap()
        .connect()
        .unwrap();

    let err = api.login(&credentials("admin", "ant.design")).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::UnexpectedStatus { status, .. } if status == StatusCode::BAD_GATEWAY
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpAuthConnector::new(&format!("http://{}", addr))
        .unwrap()
        .connect()
        .unwrap();

    let err = api.login(&credentials("admin", "ant.design")).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError(_)));
}

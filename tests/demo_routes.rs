#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The bundled `/api/v1` routes wired the way the binary wires them.

use authgate::{Config, app};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "demo-routes-secret-0123456789";

fn router() -> Router {
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        _ => None,
    })
    .unwrap();
    app::build_router(app::build_state(&config))
}

fn token(group: &str, permissions: &[&str]) -> String {
    let claims = json!({
        "providerId": "99",
        "provider": "google",
        "group": group,
        "permissions": permissions,
        "exp": chrono::Utc::now().timestamp() + 600
    });
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn get(uri: &str, bearer: Option<String>) -> Response {
    let mut req = Request::builder().uri(uri);
    if let Some(token) = bearer {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    router()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(res: Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let res = get("/api/v1/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn me_requires_a_token() {
    let res = get("/api/v1/me", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res).await,
        json!({"message": "No authorization header set"})
    );
}

#[tokio::test]
async fn me_returns_the_caller() {
    let res = get("/api/v1/me", Some(token("viewer", &[]))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["providerId"], "99");
    assert_eq!(body["provider"], "google");
    assert_eq!(body["group"], "viewer");
}

#[tokio::test]
async fn admin_denies_other_groups() {
    let res = get("/api/v1/admin", Some(token("viewer", &["posts:read"]))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(res).await,
        json!({"message": "Insufficient permissions"})
    );
}

#[tokio::test]
async fn admin_accepts_group_or_permission() {
    let res = get("/api/v1/admin", Some(token("admin", &[]))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["via_permission"], false);

    let res = get("/api/v1/admin", Some(token("support", &["admin:access"]))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["via_permission"], true);
    assert_eq!(body["group"], "support");
}

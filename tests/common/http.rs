use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use scenari_connector_rs::{GatewayConfig, GatewayState, InMemoryRepository, router};
use tower::ServiceExt;

pub const UPLOAD_PATH: &str = "/site/scenari/upload";
pub const MANIFEST_PATH: &str = "/site/scenari";

pub fn gateway(config: GatewayConfig) -> (Router, InMemoryRepository) {
    let (state, repository) = GatewayState::in_memory(&config);
    (router(state), repository)
}

pub fn default_gateway() -> (Router, InMemoryRepository) {
    gateway(GatewayConfig::default())
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn response_header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}

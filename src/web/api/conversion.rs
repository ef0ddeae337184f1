use crate::relay;
use crate::web::state::AppState;
use crate::web::utils::{client_meta::client_meta, errors};
use axum::{
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;

/// 转化事件转发接口（POST）
///
/// 补全调用方 IP / UA 后转发至上游，成功返回 `{success, data}`，失败返回 `{error}`。
pub async fn relay_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let e = relay::RelayError::MalformedBody(rejection.body_text());
            tracing::error!("[Relay] Error details: {}", e.detail());
            return e.into_response();
        }
    };
    let meta = client_meta(&headers);
    match relay::relay_event(state.upstream.as_ref(), &body, &meta).await {
        Ok(data) => errors::json_response(StatusCode::OK, errors::success_json(data)),
        Err(e) => {
            tracing::error!("[Relay] Error details: {}", e.detail());
            e.into_response()
        }
    }
}

/// CORS 预检
pub async fn preflight_handler() -> Response {
    errors::preflight_response()
}

pub async fn method_not_allowed_handler() -> Response {
    errors::method_not_allowed_response()
}

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::relay::RelayError;

pub const ALLOW_ORIGIN_ANY: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// 所有 Relay 响应都带 `Access-Control-Allow-Origin: *`
pub fn json_response(status: StatusCode, body: Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN_ANY),
    );
    response
}

pub fn error_json(error: Value) -> Value {
    serde_json::json!({ "error": error })
}

pub fn success_json(data: Value) -> Value {
    serde_json::json!({ "success": true, "data": data })
}

pub fn method_not_allowed_response() -> Response {
    let mut response = json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        error_json(Value::String("Method Not Allowed".into())),
    );
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(ALLOW_METHODS));
    response
}

pub fn preflight_response() -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN_ANY),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}

impl RelayError {
    /// 调用方输入错误与上游失败目前不区分状态码
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        json_response(self.status_code(), error_json(self.detail()))
    }
}

use serde_json::Value;

pub const MISSING_PARAMETERS: &str = "Missing required parameters: data, pixelId, or accessToken";

/// Relay 失败分类
///
/// 所有变体目前都以 500 返回给调用方，只有 `{error}` 内容不同。
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Missing required parameters: data, pixelId, or accessToken")]
    MissingParameters,
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
    #[error("Invalid event record: expected an object at data[0]")]
    InvalidEvent,
    #[error("Request failed with status code {status}")]
    Upstream { status: u16, body: Option<Value> },
    #[error("{0}")]
    Transport(String),
}

impl RelayError {
    /// 返回给调用方的错误内容：优先使用上游响应体，否则使用本地错误信息
    pub fn detail(&self) -> Value {
        match self {
            RelayError::Upstream {
                body: Some(body), ..
            } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

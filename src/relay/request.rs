use serde_json::{json, Value};

use super::error::RelayError;
use crate::common::events::Parameters;
use crate::common::json_clean::strip_nulls;

/// 调用方网络元数据（浏览器无法可靠自报）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMeta {
    pub ip: String,
    pub user_agent: String,
}

/// 通过校验的 Relay 请求
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub event: Parameters,
    pub pixel_id: String,
    pub access_token: String,
}

/// 已补全、已清理、可直接发往上游的事件
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    pub pixel_id: String,
    pub access_token: String,
    pub payload: Value,
}

impl RelayRequest {
    pub fn parse(body: &[u8]) -> Result<Self, RelayError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| RelayError::MalformedBody(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RelayError> {
        let Value::Object(mut body) = value else {
            return Err(RelayError::MalformedBody("expected a JSON object".into()));
        };

        let data = body.remove("data");
        let pixel_id = body.remove("pixelId").and_then(credential);
        let access_token = body.remove("accessToken").and_then(credential);

        let first = match data {
            Some(Value::Array(items)) => items.into_iter().next(),
            _ => None,
        };
        let (Some(first), Some(pixel_id), Some(access_token)) = (first, pixel_id, access_token)
        else {
            return Err(RelayError::MissingParameters);
        };

        let Value::Object(event) = first else {
            return Err(RelayError::InvalidEvent);
        };

        Ok(Self {
            event,
            pixel_id,
            access_token,
        })
    }

    /// 覆盖 `user_data` 中的客户端 IP / UA，并剔除所有 null 字段
    pub fn enrich(self, meta: &ClientMeta) -> OutboundEvent {
        let mut event = self.event;

        let mut user_data = match event.remove("user_data") {
            Some(Value::Object(existing)) => existing,
            _ => Parameters::new(),
        };
        user_data.insert("client_ip_address".into(), Value::String(meta.ip.clone()));
        user_data.insert(
            "client_user_agent".into(),
            Value::String(meta.user_agent.clone()),
        );
        event.insert("user_data".into(), Value::Object(user_data));

        let mut payload = json!({ "data": [Value::Object(event)] });
        strip_nulls(&mut payload);

        OutboundEvent {
            pixel_id: self.pixel_id,
            access_token: self.access_token,
            payload,
        }
    }
}

/// 凭据字段需为非空字符串或数字
fn credential(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

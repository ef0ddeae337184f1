use serde::{Deserialize, Serialize};

use super::events::{ConversionEvent, Parameters};

/// 浏览器发往 Relay 的请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub data: Vec<EventRecord>,
    #[serde(rename = "pixelId")]
    pub pixel_id: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// 平台字段命名的单条事件记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_name: String,
    pub event_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub action_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source_url: Option<String>,
    pub user_data: Parameters,
    pub custom_data: Parameters,
}

impl EventRecord {
    /// 由已归一化的转化事件构造记录，dedupe key 同时作为平台侧 `event_id`
    pub fn from_event(event: ConversionEvent, event_time: i64) -> Self {
        let (name, parameters, dedupe_key) = event.into_parts();
        Self {
            event_name: name.as_str().to_string(),
            event_time,
            event_id: Some(dedupe_key),
            action_source: "website".to_string(),
            event_source_url: None,
            user_data: Parameters::new(),
            custom_data: parameters,
        }
    }
}

impl EventEnvelope {
    pub fn single(record: EventRecord, pixel_id: &str, access_token: &str) -> Self {
        Self {
            data: vec![record],
            pixel_id: pixel_id.to_string(),
            access_token: access_token.to_string(),
        }
    }
}

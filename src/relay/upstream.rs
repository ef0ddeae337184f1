use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::error::RelayError;
use super::request::OutboundEvent;
use crate::config::UpstreamSettings;

/// 上游广告平台事件接收接口
#[async_trait::async_trait]
pub trait UpstreamApi: Send + Sync {
    /// 单次转发，不重试；成功时返回上游响应体
    async fn send_event(&self, event: &OutboundEvent) -> Result<Value, RelayError>;
}

/// Graph API 转化事件客户端
///
/// 请求地址：`{base_url}/{api_version}/{pixel_id}/events?access_token=...`
#[derive(Debug, Clone)]
pub struct GraphApiClient {
    client: Client,
    base_url: Url,
    api_version: String,
}

impl GraphApiClient {
    pub fn new(settings: &UpstreamSettings) -> anyhow::Result<Self> {
        let base_url = Url::parse(&settings.base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Upstream base URL cannot carry a path: {}", settings.base_url);
        }
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            api_version: settings.api_version.clone(),
        })
    }

    pub fn events_url(&self, pixel_id: &str, access_token: &str) -> Result<Url, RelayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RelayError::Transport("Invalid upstream base URL".into()))?
            .pop_if_empty()
            .extend([self.api_version.as_str(), pixel_id, "events"]);
        url.query_pairs_mut()
            .append_pair("access_token", access_token);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl UpstreamApi for GraphApiClient {
    async fn send_event(&self, event: &OutboundEvent) -> Result<Value, RelayError> {
        let url = self.events_url(&event.pixel_id, &event.access_token)?;

        let response = self
            .client
            .post(url)
            .json(&event.payload)
            .send()
            .await
            .map_err(|e| RelayError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Transport(format!("Failed to read response body: {}", e)))?;
        let body = decode_body(&bytes);

        if status.is_success() {
            Ok(body.unwrap_or(Value::Null))
        } else {
            Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// 上游响应体按不透明 JSON 处理；非 JSON 文本原样作为字符串返回
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

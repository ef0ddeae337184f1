use reqwest::Client;
use tokio::runtime::Handle;
use url::Url;

use crate::common::envelope::{EventEnvelope, EventRecord};
use crate::common::events::ConversionEvent;
use crate::config::TrackingSettings;

/// `emit` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// 已交给传输层（不等待结果）
    Dispatched,
    /// 客户端未加载，事件被丢弃
    Unavailable,
}

/// 外部注入的埋点能力
pub trait AnalyticsClient: Send {
    fn emit(&self, event: ConversionEvent) -> anyhow::Result<Delivery>;
}

/// 未加载埋点客户端时使用
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

impl AnalyticsClient for NoopAnalytics {
    fn emit(&self, _event: ConversionEvent) -> anyhow::Result<Delivery> {
        Ok(Delivery::Unavailable)
    }
}

/// 通过 Relay 上报事件
///
/// 请求在当前 Tokio 运行时上异步发送，调用方不等待结果；失败只记录日志。
#[derive(Debug, Clone)]
pub struct RelayAnalytics {
    client: Client,
    relay_url: Url,
    pixel_id: String,
    access_token: String,
    runtime: Handle,
}

impl RelayAnalytics {
    pub fn new(relay_url: &str, pixel_id: &str, access_token: &str) -> anyhow::Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| anyhow::anyhow!("RelayAnalytics requires a Tokio runtime: {}", e))?;
        Ok(Self {
            client: Client::builder().build()?,
            relay_url: Url::parse(relay_url)?,
            pixel_id: pixel_id.to_string(),
            access_token: access_token.to_string(),
            runtime,
        })
    }

    fn envelope(&self, event: ConversionEvent) -> EventEnvelope {
        let record = EventRecord::from_event(event, chrono::Utc::now().timestamp());
        EventEnvelope::single(record, &self.pixel_id, &self.access_token)
    }
}

impl AnalyticsClient for RelayAnalytics {
    fn emit(&self, event: ConversionEvent) -> anyhow::Result<Delivery> {
        let name = event.name();
        let request = self
            .client
            .post(self.relay_url.clone())
            .json(&self.envelope(event));

        self.runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("[Tracker] {} relayed", name);
                }
                Ok(response) => {
                    tracing::warn!("[Tracker] Relay rejected {}: HTTP {}", name, response.status());
                }
                Err(e) => {
                    tracing::error!("[Tracker] Relay request for {} failed: {}", name, e);
                }
            }
        });

        Ok(Delivery::Dispatched)
    }
}

/// 配置了 pixel 凭据时走 Relay，否则退化为 no-op
pub fn from_settings(settings: &TrackingSettings) -> anyhow::Result<Box<dyn AnalyticsClient>> {
    match (&settings.pixel_id, &settings.access_token) {
        (Some(pixel_id), Some(token)) if !pixel_id.is_empty() && !token.is_empty() => Ok(Box::new(
            RelayAnalytics::new(&settings.relay_url, pixel_id, token)?,
        )),
        _ => {
            tracing::info!("[Tracker] Pixel credentials not configured, tracking disabled");
            Ok(Box::new(NoopAnalytics))
        }
    }
}

use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::Serialize;
use tokio::runtime::Handle;
use url::Url;

/// 写入订单表格的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    pub website: String,
    #[serde(rename = "adId")]
    pub ad_id: String,
    pub timestamp: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    /// 每个商品一行
    pub products: String,
    pub delivery: String,
    pub total: u64,
}

/// 订单记录接收方，调用方不关心结果
pub trait OrderSink: Send {
    fn submit(&self, record: OrderRecord);
}

/// 表格脚本接口（fire-and-forget POST）
#[derive(Debug, Clone)]
pub struct SheetOrderLog {
    client: Client,
    endpoint: Url,
    runtime: Handle,
}

impl SheetOrderLog {
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| anyhow::anyhow!("SheetOrderLog requires a Tokio runtime: {}", e))?;
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: Url::parse(endpoint)?,
            runtime,
        })
    }
}

impl OrderSink for SheetOrderLog {
    fn submit(&self, record: OrderRecord) {
        let request = self.client.post(self.endpoint.clone()).json(&record);
        self.runtime.spawn(async move {
            if let Err(e) = request.send().await {
                tracing::error!("[OrderLog] Failed to log order: {}", e);
            }
        });
    }
}

const DHAKA_OFFSET_SECS: i32 = 6 * 3600;

/// 达卡时区（UTC+6，无夏令时）长格式时间，如 `October 16, 2026, 03:04:05 PM`
pub fn dhaka_timestamp(now: DateTime<Utc>) -> String {
    let offset = FixedOffset::east_opt(DHAKA_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset)
        .format("%B %-d, %Y, %I:%M:%S %p")
        .to_string()
}

use config::{Config, Environment, File};
use serde::Deserialize;

/// 应用配置总结构
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub tracking: TrackingSettings,
    pub catalog: CatalogSettings,
    pub order_log: OrderLogSettings,
}

/// 服务相关配置（监听地址、端口、转发接口路径）
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Relay 挂载路径，默认与原 serverless 函数地址保持一致
    pub route: String,
}

/// 上游广告平台接口配置
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    /// 例如 `https://graph.facebook.com`
    pub base_url: String,
    pub api_version: String,
}

/// 前端埋点（Normalizer）配置
#[derive(Debug, Deserialize, Clone)]
pub struct TrackingSettings {
    /// 未显式传入 `currency` 时补齐的默认币种
    pub currency: String,
    /// 浏览器侧调用 Relay 的完整地址
    pub relay_url: String,
    pub pixel_id: Option<String>,
    pub access_token: Option<String>,
}

/// 商品价格与运费配置
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    pub base_price: u64,
    pub hijab_price: u64,
    pub shipping_dhaka: u64,
    pub shipping_outside: u64,
    /// 单个商品允许的最大数量
    pub max_quantity: u32,
    /// 划线原价相对售价的上浮比例（百分比）
    pub markup_percent: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_price: 750,
            hijab_price: 1050,
            shipping_dhaka: 80,
            shipping_outside: 150,
            max_quantity: 10,
            markup_percent: 20,
        }
    }
}

/// 订单表格（Spreadsheet）记录配置
#[derive(Debug, Deserialize, Clone)]
pub struct OrderLogSettings {
    pub endpoint: String,
    /// 站点标识，写入每一行订单记录
    pub website: String,
    pub ad_id: String,
}

impl Settings {
    /// 加载配置：支持默认值、可选配置文件、环境变量覆盖
    pub fn new() -> anyhow::Result<Self> {
        let builder = Config::builder()
            // 默认值（代码内硬编码）
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8888)?
            .set_default("server.route", "/.netlify/functions/conversion-api")?
            .set_default("upstream.base_url", "https://graph.facebook.com")?
            .set_default("upstream.api_version", "v17.0")?
            .set_default("tracking.currency", "BDT")?
            .set_default(
                "tracking.relay_url",
                "http://127.0.0.1:8888/.netlify/functions/conversion-api",
            )?
            .set_default::<&str, Option<String>>("tracking.pixel_id", None)?
            .set_default::<&str, Option<String>>("tracking.access_token", None)?
            .set_default("catalog.base_price", 750)?
            .set_default("catalog.hijab_price", 1050)?
            .set_default("catalog.shipping_dhaka", 80)?
            .set_default("catalog.shipping_outside", 150)?
            .set_default("catalog.max_quantity", 10)?
            .set_default("catalog.markup_percent", 20)?
            .set_default("order_log.endpoint", "https://script.google.com/macros/s/exec")?
            .set_default("order_log.website", "P-750")?
            .set_default("order_log.ad_id", "MH(API)-1.0")?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("PIXEL").separator("__"));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

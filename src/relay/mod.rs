pub mod error;
pub mod request;
pub mod upstream;

pub use error::RelayError;
pub use request::{ClientMeta, OutboundEvent, RelayRequest};
pub use upstream::{GraphApiClient, UpstreamApi};

use serde_json::Value;

/// 处理一次转发：解析 -> 补全 -> 上游单次调用
///
/// 参数缺失时直接返回错误，不会触发任何上游请求。
pub async fn relay_event(
    upstream: &dyn UpstreamApi,
    body: &[u8],
    meta: &ClientMeta,
) -> Result<Value, RelayError> {
    let outbound = RelayRequest::parse(body)?.enrich(meta);

    tracing::debug!(
        "[Relay] Sending event to upstream (pixel={}): {}",
        outbound.pixel_id,
        outbound.payload
    );

    let response = upstream.send_event(&outbound).await?;
    tracing::info!("[Relay] Upstream response: {}", response);
    Ok(response)
}

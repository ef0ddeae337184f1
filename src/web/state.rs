use crate::relay::UpstreamApi;
use std::sync::Arc;

/// Web 应用全局状态
///
/// 职责：包含所有跨请求共享的对象，通过 Arc 注入到 Axum 的 Handler 中。
/// Relay 本身无状态，这里只持有上游客户端。
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn UpstreamApi>,
}

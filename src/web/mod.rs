pub mod api;
pub mod state;
pub mod utils;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use self::api::conversion;
use self::state::AppState;

/// 构建 Relay 路由：`route` 只接受 POST / OPTIONS，其余方法返回 405
pub fn router(state: Arc<AppState>, route: &str) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            route,
            post(conversion::relay_handler)
                .options(conversion::preflight_handler)
                .fallback(conversion::method_not_allowed_handler),
        )
        .with_state(state)
}

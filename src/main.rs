use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

use pixel_relay::config::Settings;
use pixel_relay::relay::GraphApiClient;
use pixel_relay::web::{self, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pixel_relay=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("[Startup] Conversion relay initializing...");

    let settings = Settings::new()?;
    info!(
        "[Config] Binding at {}:{}, upstream {}/{}",
        settings.server.host,
        settings.server.port,
        settings.upstream.base_url,
        settings.upstream.api_version
    );

    let upstream = GraphApiClient::new(&settings.upstream)?;
    let state = Arc::new(AppState {
        upstream: Arc::new(upstream),
    });

    let app = web::router(state, &settings.server.route)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "[Startup] Relay ready at http://{}{}",
        addr, settings.server.route
    );
    axum::serve(listener, app).await?;

    Ok(())
}

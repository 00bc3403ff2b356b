use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tickerlens_core::dashboard::Dashboard;
use tickerlens_core::domain::stock::SectorBenchmarks;
use tickerlens_core::reference::ReferenceStore;

mod pages;

const DEFAULT_PORT: u16 = 5001;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tickerlens_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let store = match ReferenceStore::load(&settings) {
        Ok(store) => store,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "reference tables failed to load; starting with an empty stock list");
            ReferenceStore::new(Vec::new(), SectorBenchmarks::default())
        }
    };

    let dashboard = Dashboard::from_settings(&settings, Arc::new(store))?;
    let app = router(pages::AppState::new(dashboard));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "dashboard listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: pages::AppState) -> Router {
    Router::new()
        .route("/", get(pages::search))
        .route("/dashboard", get(pages::dashboard_view))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &tickerlens_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

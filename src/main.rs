// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::clock::SystemClock;
use crate::infrastructure::config::{load_service_config, load_widget_defaults};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    apply_custom_range, dashboard_timewindow, destroy_widget, get_widget, health_check, init_widget,
    navigate, process_series_handler, select_mode, update_context, widget_timewindow,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let service_config = load_service_config()?;
    let widget_defaults = load_widget_defaults()?;

    let state = Arc::new(AppState::new(
        widget_defaults,
        service_config.server.use_dashboard_timewindow,
        Arc::new(SystemClock),
    ));

    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/widgets/:id", put(init_widget).get(get_widget).delete(destroy_widget))
        .route("/widgets/:id/mode", post(select_mode))
        .route("/widgets/:id/navigate", post(navigate))
        .route("/widgets/:id/custom-range", post(apply_custom_range))
        .route("/widgets/:id/context", put(update_context))
        .route("/series/process", post(process_series_handler))
        .route("/timewindows/dashboard", get(dashboard_timewindow))
        .route("/timewindows/widgets/:id", get(widget_timewindow))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = service_config.server.bind_address.parse()?;
    tracing::info!("Starting dashboard-widgets service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

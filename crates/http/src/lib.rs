//! HTTP server facade for Shelf with Axum, error handling, and OpenAPI support.

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};

use shelf_db::RecordStore;
use shelf_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod html;
pub mod router;
pub mod site;

use router::RouterBuilder;
use site::SiteState;

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    store: Arc<dyn RecordStore>,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings, store);
    let address = format!("{}:{}", settings.server.host, settings.server.port);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router: site pages, module routes, docs, middleware
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &Settings,
    store: Arc<dyn RecordStore>,
) -> Router {
    let site = SiteState::new(registry, settings, store);

    let mut router_builder = RouterBuilder::new()
        .route("/healthz", get(health_check))
        .merge(site::routes(site));

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(
            module = module_name,
            "mounting module routes under /api/{}",
            module_name
        );
        router_builder = router_builder
            .mount_module(module_name, module.routes())
            .merge(module.pages());
    }

    router_builder
        .with_openapi(registry)
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

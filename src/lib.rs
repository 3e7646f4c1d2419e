//! Shelf book search application.
//!
//! Wires the books module into the kernel, seeds the record store and
//! serves the site and API over HTTP.

pub mod modules;
pub mod utils;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use shelf_db::{seed, MemoryStore, RecordStore};
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Register, initialize and start every module, seeding the store from the
/// configured catalog in between so content types exist before records do.
pub async fn bootstrap(settings: &Settings, store: &Arc<dyn RecordStore>) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, settings)?;

    let ctx = InitCtx { settings, store };
    registry.init_modules(&ctx).await?;

    if let Some(path) = &settings.catalog.seed_path {
        seed::load_catalog(store.as_ref(), path)
            .await
            .with_context(|| format!("failed to seed catalog from {}", path.display()))?;
    }

    registry.start_modules(&ctx).await?;
    tracing::info!(modules = registry.len(), "shelf bootstrap complete");
    Ok(registry)
}

/// Bootstrap and build the full HTTP application without binding a socket.
pub async fn build_app(settings: &Settings, store: Arc<dyn RecordStore>) -> anyhow::Result<Router> {
    let registry = bootstrap(settings, &store).await?;
    Ok(shelf_http::build_router(&registry, settings, store))
}

/// Serve until shutdown, then stop modules in reverse order.
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let registry = bootstrap(settings, &store).await?;

    shelf_http::start_server(&registry, settings, store).await?;
    registry.stop_modules().await
}

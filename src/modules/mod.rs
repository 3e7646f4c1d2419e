pub mod books;

use std::sync::Arc;

use shelf_db::RecordStore;
use shelf_kernel::{settings::Settings, ModuleRegistry};

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: &Arc<dyn RecordStore>,
    settings: &Settings,
) -> anyhow::Result<()> {
    registry.register(books::create_module(store.clone(), settings.search.clone()))?;
    Ok(())
}

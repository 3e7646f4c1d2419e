use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use shelf_db::{QueryHook, QueryVars, RecordStore};

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub store: &'a Arc<dyn RecordStore>,
}

/// Core module trait that all Shelf modules must implement
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context.
    /// Content types and taxonomies are registered here.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's API routes
    /// Routes will be mounted under `/api/{module_name}`
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Routes merged at the site root (static assets and the like)
    fn pages(&self) -> Router {
        Router::new()
    }

    /// Hooks run against the site's main query before it executes
    fn query_hooks(&self) -> Vec<Arc<dyn QueryHook>> {
        vec![]
    }

    /// Markup this module embeds in the site front page, if any
    async fn embed(&self, _vars: &QueryVars) -> anyhow::Result<Option<String>> {
        Ok(None)
    }

    /// Return OpenAPI specification fragment for this module as JSON
    /// Will be merged with other modules' specs
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Start background tasks for this module
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

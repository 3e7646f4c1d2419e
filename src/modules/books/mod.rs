pub mod admin;
pub mod filter;
pub mod form;
pub mod handlers;
pub mod models;
pub mod registration;
pub mod render;
pub mod search;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use serde_json::json;
use shelf_db::{QueryHook, QueryVars, RecordStore};
use shelf_kernel::{settings::SearchSettings, InitCtx, Module};

use form::{FormContext, FormRenderer};
use handlers::BooksState;
use models::{SearchParams, AUTHOR_TAXONOMY, PUBLISHER_TAXONOMY};
use search::BookSearchHook;

/// Book catalog: content registration, the search form, both search paths
/// and the admin meta boxes.
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(store: Arc<dyn RecordStore>, settings: SearchSettings) -> Self {
        Self {
            state: BooksState {
                store,
                settings: Arc::new(settings),
            },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        registration::register(ctx.store.as_ref()).await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            price_match = ?self.state.settings.price_match,
            "books module initialized"
        );
        tracing::info!(
            module = self.name(),
            "the book search form is embedded on the front page; results load from {}",
            form::FRAGMENT_ENDPOINT
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_books))
            .route("/search", get(handlers::fragment_search))
            .route("/health", get(handlers::health_check))
            .route(
                "/admin/{id}/meta",
                get(handlers::edit_meta).post(handlers::save_meta),
            )
            .with_state(self.state.clone())
    }

    fn pages(&self) -> Router {
        Router::new()
            .route("/assets/book-search.js", get(handlers::script))
            .route("/assets/book-search.css", get(handlers::stylesheet))
    }

    fn query_hooks(&self) -> Vec<Arc<dyn QueryHook>> {
        vec![Arc::new(BookSearchHook::new(self.state.settings.price_match))]
    }

    async fn embed(&self, vars: &QueryVars) -> anyhow::Result<Option<String>> {
        let store = self.state.store.as_ref();
        let authors = store.terms(AUTHOR_TAXONOMY).await?;
        let publishers = store.terms(PUBLISHER_TAXONOMY).await?;
        let params = SearchParams::from_vars(vars);

        let markup = FormRenderer::new(&self.state.settings).render(&FormContext {
            params: &params,
            authors: &authors,
            publishers: &publishers,
        });
        Ok(Some(markup))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let filters = json!([
            { "name": "s", "in": "query", "schema": { "type": "string" }, "description": "Free text matched against title and description" },
            { "name": "author", "in": "query", "schema": { "type": "string" }, "description": "Author slug" },
            { "name": "publisher", "in": "query", "schema": { "type": "string" }, "description": "Publisher slug" },
            { "name": "rating", "in": "query", "schema": { "type": "string" }, "description": "Exact rating, 1 to 5" },
            { "name": "price", "in": "query", "schema": { "type": "string" }, "description": "Price bound" }
        ]);
        let mut fragment_params = filters.as_array().cloned().unwrap_or_default();
        fragment_params.push(json!({
            "name": "action", "in": "query", "required": true,
            "schema": { "type": "string", "enum": [models::SEARCH_ACTION] }
        }));
        let error = json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Search books",
                        "tags": ["Books"],
                        "parameters": filters,
                        "responses": {
                            "200": {
                                "description": "Matching books, newest first",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                                    }
                                }
                            }
                        }
                    }
                },
                "/search": {
                    "get": {
                        "summary": "Search books as an HTML fragment",
                        "tags": ["Books"],
                        "parameters": fragment_params,
                        "responses": {
                            "200": {
                                "description": "Result fragment",
                                "content": { "text/html": { "schema": { "type": "string" } } }
                            },
                            "400": { "description": "Missing or unknown action", "content": error["content"] }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                },
                "/admin/{id}/meta": {
                    "get": {
                        "summary": "Rating and price meta boxes",
                        "tags": ["Books admin"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }],
                        "responses": {
                            "200": { "description": "Meta box form", "content": { "text/html": { "schema": { "type": "string" } } } },
                            "404": { "description": "Unknown book", "content": error["content"] }
                        }
                    },
                    "post": {
                        "summary": "Save rating and price",
                        "tags": ["Books admin"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }],
                        "requestBody": {
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "book_rating_field": { "type": "string" },
                                            "book_price_field": { "type": "string" }
                                        }
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": { "description": "Whether anything was saved" },
                            "404": { "description": "Unknown book", "content": error["content"] },
                            "422": { "description": "Invalid rating or price", "content": error["content"] }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Term": {
                        "type": "object",
                        "properties": {
                            "slug": { "type": "string" },
                            "name": { "type": "string" }
                        },
                        "required": ["slug", "name"]
                    },
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "description": "Record id" },
                            "title": { "type": "string" },
                            "excerpt": { "type": "string" },
                            "author": { "$ref": "#/components/schemas/Term" },
                            "publisher": { "$ref": "#/components/schemas/Term" },
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "price": { "type": "number" }
                        },
                        "required": ["id", "title", "excerpt"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn RecordStore>, settings: SearchSettings) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store, settings))
}

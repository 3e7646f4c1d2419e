use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
    Form, Json,
};
use serde_json::json;
use shelf_db::{RecordId, RecordStore};
use shelf_http::{error::AppError, html::document};
use shelf_kernel::settings::SearchSettings;

use super::admin;
use super::filter::FilterSpec;
use super::models::{AdminMetaForm, Book, SearchParams, SEARCH_ACTION};
use super::render::ResultRenderer;
use super::search::search_books;

/// Shared state of the books routes
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<dyn RecordStore>,
    pub settings: Arc<SearchSettings>,
}

impl BooksState {
    fn spec(&self, params: &SearchParams) -> FilterSpec {
        FilterSpec::from_params(params, self.settings.price_match)
    }
}

/// Fragment path: the result markup only, for in-place replacement.
pub async fn fragment_search(
    State(state): State<BooksState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    if params.action.as_deref() != Some(SEARCH_ACTION) {
        return Err(AppError::bad_request(format!(
            "expected action={SEARCH_ACTION}"
        )));
    }

    let matches = search_books(state.store.as_ref(), &state.spec(&params)).await?;
    Ok(Html(ResultRenderer::new(&state.settings).results(matches)))
}

/// Same filters as the fragment path, as JSON.
pub async fn list_books(
    State(state): State<BooksState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Book>>, AppError> {
    let excerpt_words = state.settings.excerpt_words;
    let books = search_books(state.store.as_ref(), &state.spec(&params))
        .await?
        .map(|record| Book::from_record(&record, excerpt_words))
        .collect();
    Ok(Json(books))
}

pub async fn edit_meta(
    State(state): State<BooksState>,
    Path(id): Path<RecordId>,
) -> Result<Html<String>, AppError> {
    let record = admin::load_book(state.store.as_ref(), id).await?;
    let title = format!("Edit {}", record.title);
    Ok(Html(document(&title, &admin::render_meta_boxes(&record))))
}

pub async fn save_meta(
    State(state): State<BooksState>,
    Path(id): Path<RecordId>,
    Form(form): Form<AdminMetaForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = admin::save(state.store.as_ref(), id, &form).await?;
    Ok(Json(json!({ "id": id, "updated": updated })))
}

pub async fn health_check() -> &'static str {
    "books module is healthy"
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        include_str!("../../../assets/book-search.js"),
    )
}

pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("../../../assets/book-search.css"),
    )
}

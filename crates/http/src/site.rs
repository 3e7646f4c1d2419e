//! Site front page: module embeds plus the main query rendered with the
//! default template.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use shelf_db::{prepare_main_query, QueryHook, QueryVars, Record, RecordStore};
use shelf_kernel::{settings::Settings, Module, ModuleRegistry};

use crate::error::AppError;
use crate::html::{document, escape};

/// Shared state of the front page
#[derive(Clone)]
pub struct SiteState {
    store: Arc<dyn RecordStore>,
    modules: Arc<[Arc<dyn Module>]>,
    hooks: Arc<[Arc<dyn QueryHook>]>,
    title: String,
    excerpt_words: usize,
}

impl SiteState {
    pub fn new(registry: &ModuleRegistry, settings: &Settings, store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            modules: registry.modules().iter().cloned().collect(),
            hooks: registry.query_hooks().into(),
            title: settings.site.title.clone(),
            excerpt_words: settings.search.excerpt_words,
        }
    }
}

pub fn routes(state: SiteState) -> Router {
    Router::new()
        .route("/", get(front_page))
        .with_state(state)
}

/// `GET /`: every query parameter becomes a main-query variable.
async fn front_page(
    State(site): State<SiteState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Html<String>, AppError> {
    let vars = QueryVars::new(params);

    let mut body = String::new();
    for module in site.modules.iter() {
        if let Some(markup) = module.embed(&vars).await? {
            body.push_str(&markup);
            body.push('\n');
        }
    }

    let query = prepare_main_query(&vars, site.hooks.iter().map(|hook| hook.as_ref()));
    if query.is_search() {
        let matches = site.store.query(&query).await?;
        tracing::debug!(results = matches.len(), "main query executed");
        let heading = query.search.as_deref().unwrap_or_default();
        body.push_str(&search_results(heading, matches, site.excerpt_words));
    }

    Ok(Html(document(&site.title, &body)))
}

/// Default search template: title and excerpt per record.
fn search_results(search: &str, records: impl Iterator<Item = Record>, excerpt_words: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<section class=\"search-results\">\n<h2>Search Results for: {}</h2>",
        escape(search)
    );

    let mut found = false;
    for record in records {
        found = true;
        let _ = writeln!(
            out,
            "<article class=\"record type-{}\"><h3>{}</h3><p>{}</p></article>",
            escape(&record.post_type),
            escape(&record.title),
            escape(&record.excerpt(excerpt_words)),
        );
    }
    if !found {
        out.push_str("<p class=\"no-results\">Nothing found.</p>\n");
    }

    out.push_str("</section>\n");
    out
}

//! Search executor and the page-path query hook.

use shelf_db::{Matches, Query, QueryHook, QueryVars, RecordStore, StoreError};
use shelf_kernel::settings::PriceMatch;

use super::filter::FilterSpec;
use super::models::{SearchParams, POST_TYPE};

/// Run `spec` against the store. Matches come back in store order; no
/// matches is an empty sequence, not an error.
pub async fn search_books(store: &dyn RecordStore, spec: &FilterSpec) -> Result<Matches, StoreError> {
    let query = spec.to_query();
    let matches = store.query(&query).await?;
    tracing::debug!(?spec, results = matches.len(), "book search executed");
    Ok(matches)
}

/// Installs the book filters on the site's main query when it is a
/// front-end book search.
pub struct BookSearchHook {
    price_match: PriceMatch,
}

impl BookSearchHook {
    pub fn new(price_match: PriceMatch) -> Self {
        Self { price_match }
    }
}

impl QueryHook for BookSearchHook {
    fn name(&self) -> &'static str {
        "book-search"
    }

    fn pre_get_posts(&self, query: &mut Query, vars: &QueryVars) {
        if vars.is_admin() || !query.is_post_type(POST_TYPE) || !query.is_search() {
            return;
        }

        let spec = FilterSpec::from_params(&SearchParams::from_vars(vars), self.price_match);
        spec.apply(query);
    }
}

use serde::{Deserialize, Serialize};
use shelf_db::{QueryVars, Record, RecordId, Term};

pub const POST_TYPE: &str = "book";
pub const AUTHOR_TAXONOMY: &str = "author";
pub const PUBLISHER_TAXONOMY: &str = "publisher";
pub const RATING_META_KEY: &str = "_book_rating";
pub const PRICE_META_KEY: &str = "_book_price";

/// Action discriminator the fragment endpoint answers to.
pub const SEARCH_ACTION: &str = "book_search";

/// Raw, untrusted search parameters as submitted by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub s: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl SearchParams {
    pub fn from_vars(vars: &QueryVars) -> Self {
        let get = |key: &str| vars.get(key).map(str::to_string);
        Self {
            s: get("s"),
            author: get("author"),
            publisher: get("publisher"),
            rating: get("rating"),
            price: get("price"),
            action: get("action"),
        }
    }
}

/// A book as exposed by the JSON API and the result renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    /// Record id in the store
    pub id: RecordId,
    pub title: String,
    /// Manual excerpt or the leading words of the description
    pub excerpt: String,
    pub author: Option<Term>,
    pub publisher: Option<Term>,
    /// 1 to 5, when set
    pub rating: Option<u8>,
    pub price: Option<f64>,
}

impl Book {
    pub fn from_record(record: &Record, excerpt_words: usize) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            excerpt: record.excerpt(excerpt_words),
            author: record.term(AUTHOR_TAXONOMY).cloned(),
            publisher: record.term(PUBLISHER_TAXONOMY).cloned(),
            rating: record
                .meta(RATING_META_KEY)
                .and_then(|v| v.trim().parse().ok()),
            price: record
                .meta(PRICE_META_KEY)
                .and_then(|v| v.trim().parse().ok()),
        }
    }
}

/// Admin meta box submission. Both fields must be present to save.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminMetaForm {
    #[serde(default)]
    pub book_rating_field: Option<String>,
    #[serde(default)]
    pub book_price_field: Option<String>,
}

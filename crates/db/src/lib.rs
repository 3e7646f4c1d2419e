//! Record store for Shelf: posts with attached meta attributes and taxonomy
//! terms, plus the predicate query engine the modules search through.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub mod hooks;
pub mod memory;
pub mod query;
pub mod record;
pub mod seed;

pub use hooks::{prepare_main_query, QueryHook, QueryVars};
pub use memory::MemoryStore;
pub use query::{Compare, Matches, MetaClause, Query, TaxClause};
pub use record::{NewRecord, Record, RecordId, Term, TermCount};

/// Errors surfaced by a [`RecordStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),

    #[error("post type '{0}' is not registered")]
    UnknownPostType(String),

    #[error("taxonomy '{0}' is not registered")]
    UnknownTaxonomy(String),

    #[error("failed to read seed catalog {}", path.display())]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed catalog")]
    SeedParse(#[from] serde_json::Error),
}

/// Storage backend holding content records and answering predicate queries.
///
/// Reads never block each other; implementations provide their own
/// concurrency control for writes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Declare a post type so records of that type can be stored.
    async fn register_post_type(&self, post_type: &str) -> Result<(), StoreError>;

    /// Declare a taxonomy attached to the given post types.
    async fn register_taxonomy(
        &self,
        taxonomy: &str,
        post_types: &[&str],
    ) -> Result<(), StoreError>;

    /// Store a new record and return its id.
    async fn insert(&self, record: NewRecord) -> Result<RecordId, StoreError>;

    /// Fetch a single record.
    async fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError>;

    /// Set (or replace) one meta attribute on an existing record.
    async fn update_meta(&self, id: RecordId, key: &str, value: &str) -> Result<(), StoreError>;

    /// Run a query. Every clause must hold for a record to match; results
    /// come back newest first.
    async fn query(&self, query: &Query) -> Result<Matches, StoreError>;

    /// Terms of a taxonomy with the number of records using each, sorted by name.
    async fn terms(&self, taxonomy: &str) -> Result<Vec<TermCount>, StoreError>;
}

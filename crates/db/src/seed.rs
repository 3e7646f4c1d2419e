//! JSON seed catalogs: a top-level array of records.
//!
//! ```json
//! [
//!   {
//!     "post_type": "book",
//!     "title": "Foundation",
//!     "content": "...",
//!     "meta": { "_book_rating": "5", "_book_price": "10" },
//!     "terms": { "author": [{ "slug": "asimov", "name": "Isaac Asimov" }] }
//!   }
//! ]
//! ```

use std::path::Path;

use crate::record::NewRecord;
use crate::{RecordStore, StoreError};

pub fn parse_catalog(json: &str) -> Result<Vec<NewRecord>, StoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Insert every record of the catalog at `path`, returning how many were stored.
pub async fn load_catalog(store: &dyn RecordStore, path: &Path) -> Result<usize, StoreError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;

    let records = parse_catalog(&json)?;
    let count = records.len();
    for record in records {
        store.insert(record).await?;
    }

    tracing::info!(path = %path.display(), count, "seed catalog loaded");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, Query};

    const CATALOG: &str = r#"[
        {
            "post_type": "book",
            "title": "Foundation",
            "meta": { "_book_rating": "5" },
            "terms": { "author": [{ "slug": "asimov", "name": "Isaac Asimov" }] }
        },
        { "post_type": "book", "title": "Untitled draft" }
    ]"#;

    #[test]
    fn parse_fills_defaults() {
        let records = parse_catalog(CATALOG).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].meta.get("_book_rating").map(String::as_str), Some("5"));
        assert!(records[1].content.is_empty());
        assert!(records[1].terms.is_empty());
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let err = parse_catalog("{ not json").unwrap_err();
        assert!(matches!(err, StoreError::SeedParse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn load_inserts_records() {
        let path = std::env::temp_dir().join(format!("shelf-seed-{}.json", std::process::id()));
        tokio::fs::write(&path, CATALOG).await.unwrap();

        let store = MemoryStore::new();
        store.register_post_type("book").await.unwrap();
        store.register_taxonomy("author", &["book"]).await.unwrap();

        let count = load_catalog(&store, &path).await.unwrap();
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(count, 2);
        assert_eq!(store.query(&Query::for_post_type("book")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let store = MemoryStore::new();
        let err = load_catalog(&store, Path::new("/nonexistent/catalog.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            StoreError::SeedRead { path, source }
                if path.ends_with("catalog.json") && source.kind() == std::io::ErrorKind::NotFound
        ));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}

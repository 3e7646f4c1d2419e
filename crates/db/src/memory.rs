use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::query::{Matches, Query};
use crate::record::{NewRecord, Record, RecordId, Term, TermCount};
use crate::{RecordStore, StoreError};

#[derive(Default)]
struct Tables {
    next_id: RecordId,
    records: BTreeMap<RecordId, Record>,
    post_types: BTreeSet<String>,
    /// taxonomy -> post types it is attached to
    taxonomies: BTreeMap<String, BTreeSet<String>>,
}

/// In-process [`RecordStore`]. Ids increase monotonically, so id order is
/// insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn register_post_type(&self, post_type: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.post_types.insert(post_type.to_string()) {
            tracing::debug!(post_type, "registered post type");
        }
        Ok(())
    }

    async fn register_taxonomy(
        &self,
        taxonomy: &str,
        post_types: &[&str],
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(missing) = post_types.iter().find(|p| !tables.post_types.contains(**p)) {
            return Err(StoreError::UnknownPostType(missing.to_string()));
        }

        let attached = tables.taxonomies.entry(taxonomy.to_string()).or_default();
        attached.extend(post_types.iter().map(|p| p.to_string()));
        tracing::debug!(taxonomy, ?post_types, "registered taxonomy");
        Ok(())
    }

    async fn insert(&self, record: NewRecord) -> Result<RecordId, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.post_types.contains(&record.post_type) {
            return Err(StoreError::UnknownPostType(record.post_type));
        }
        for taxonomy in record.terms.keys() {
            let attached = tables
                .taxonomies
                .get(taxonomy)
                .is_some_and(|types| types.contains(&record.post_type));
            if !attached {
                return Err(StoreError::UnknownTaxonomy(taxonomy.clone()));
            }
        }

        tables.next_id += 1;
        let id = tables.next_id;
        tables.records.insert(
            id,
            Record {
                id,
                post_type: record.post_type,
                title: record.title,
                content: record.content,
                excerpt: record.excerpt,
                meta: record.meta,
                terms: record.terms,
            },
        );
        Ok(id)
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        Ok(self.tables.read().await.records.get(&id).cloned())
    }

    async fn update_meta(&self, id: RecordId, key: &str, value: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        record.meta.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn query(&self, query: &Query) -> Result<Matches, StoreError> {
        let tables = self.tables.read().await;

        if let Some(clause) = query
            .tax
            .iter()
            .find(|clause| !tables.taxonomies.contains_key(&clause.taxonomy))
        {
            tracing::warn!(taxonomy = %clause.taxonomy, "query references unregistered taxonomy");
            return Ok(Matches::new(Vec::new()));
        }

        let records: Vec<Record> = tables
            .records
            .values()
            .rev()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();

        tracing::debug!(matched = records.len(), "query executed");
        Ok(Matches::new(records))
    }

    async fn terms(&self, taxonomy: &str) -> Result<Vec<TermCount>, StoreError> {
        let tables = self.tables.read().await;
        if !tables.taxonomies.contains_key(taxonomy) {
            return Err(StoreError::UnknownTaxonomy(taxonomy.to_string()));
        }

        let mut counts: BTreeMap<String, (Term, usize)> = BTreeMap::new();
        for term in tables
            .records
            .values()
            .filter_map(|record| record.terms.get(taxonomy))
            .flatten()
        {
            counts
                .entry(term.slug.clone())
                .and_modify(|(_, count)| *count += 1)
                .or_insert_with(|| (term.clone(), 1));
        }

        let mut terms: Vec<TermCount> = counts
            .into_values()
            .map(|(term, count)| TermCount { term, count })
            .collect();
        terms.sort_by(|a, b| a.term.name.cmp(&b.term.name));
        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Compare, MetaClause, TaxClause};

    async fn catalog() -> MemoryStore {
        let store = MemoryStore::new();
        store.register_post_type("book").await.unwrap();
        store.register_taxonomy("author", &["book"]).await.unwrap();
        store
            .insert(
                NewRecord::new("book", "Foundation")
                    .meta("_book_price", "10")
                    .term("author", "asimov", "Isaac Asimov"),
            )
            .await
            .unwrap();
        store
            .insert(
                NewRecord::new("book", "Dune")
                    .meta("_book_price", "25")
                    .term("author", "herbert", "Frank Herbert"),
            )
            .await
            .unwrap();
        store
            .insert(
                NewRecord::new("book", "I, Robot")
                    .meta("_book_price", "50")
                    .term("author", "asimov", "Isaac Asimov"),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn query_returns_newest_first() {
        let store = catalog().await;
        let titles: Vec<String> = store
            .query(&Query::for_post_type("book"))
            .await
            .unwrap()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["I, Robot", "Dune", "Foundation"]);
    }

    #[tokio::test]
    async fn query_combines_clauses() {
        let store = catalog().await;
        let mut query = Query::for_post_type("book");
        query.tax.push(TaxClause::slug("author", "asimov"));
        query.meta.push(MetaClause::numeric("_book_price", Compare::Le, "20"));

        let titles: Vec<String> = store.query(&query).await.unwrap().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Foundation"]);
    }

    #[tokio::test]
    async fn unregistered_taxonomy_matches_nothing() {
        let store = catalog().await;
        let mut query = Query::for_post_type("book");
        query.tax.push(TaxClause::slug("genre", "scifi"));
        assert_eq!(store.query(&query).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn insert_rejects_unknown_post_type_and_taxonomy() {
        let store = catalog().await;
        let err = store.insert(NewRecord::new("page", "About")).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownPostType(p) if p == "page"));

        let err = store
            .insert(NewRecord::new("book", "Emma").term("publisher", "penguin", "Penguin"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownTaxonomy(t) if t == "publisher"));
    }

    #[tokio::test]
    async fn terms_are_counted_and_sorted_by_name() {
        let store = catalog().await;
        let terms = store.terms("author").await.unwrap();
        let summary: Vec<(&str, usize)> = terms
            .iter()
            .map(|t| (t.term.slug.as_str(), t.count))
            .collect();
        assert_eq!(summary, vec![("herbert", 1), ("asimov", 2)]);
    }

    #[tokio::test]
    async fn update_meta_on_missing_record_fails() {
        let store = catalog().await;
        store.update_meta(1, "_book_price", "12").await.unwrap();
        assert_eq!(
            store.get(1).await.unwrap().unwrap().meta("_book_price"),
            Some("12")
        );

        let err = store.update_meta(99, "_book_price", "1").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(99)));
    }
}

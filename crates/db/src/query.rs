//! Query model and the predicate matcher used by store implementations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::record::Record;

static SEARCH_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("valid search term pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compare {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<=")]
    Le,
}

/// A numeric predicate on one meta attribute: `meta[key] <compare> value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaClause {
    pub key: String,
    pub value: String,
    pub compare: Compare,
}

impl MetaClause {
    pub fn numeric(key: impl Into<String>, compare: Compare, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            compare,
        }
    }

    fn matches(&self, record: &Record) -> bool {
        let Some(stored) = record.meta(&self.key) else {
            return false;
        };

        // Only finite numbers on both sides can satisfy a clause.
        let (Some(stored), Some(operand)) = (finite(stored), finite(&self.value)) else {
            return false;
        };
        match self.compare {
            Compare::Eq => stored == operand,
            Compare::Le => stored <= operand,
        }
    }
}

fn finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// A predicate requiring a record to carry the term `slug` in `taxonomy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxClause {
    pub taxonomy: String,
    pub slug: String,
}

impl TaxClause {
    pub fn slug(taxonomy: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            slug: slug.into(),
        }
    }
}

/// A structured content query. All present clauses are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Query {
    pub post_type: Option<String>,
    /// Free-text search; `Some` marks the query as a search even when blank.
    pub search: Option<String>,
    pub meta: Vec<MetaClause>,
    pub tax: Vec<TaxClause>,
}

impl Query {
    pub fn for_post_type(post_type: impl Into<String>) -> Self {
        Self {
            post_type: Some(post_type.into()),
            ..Self::default()
        }
    }

    pub fn is_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn is_post_type(&self, post_type: &str) -> bool {
        self.post_type.as_deref() == Some(post_type)
    }

    /// Whether `record` satisfies every clause of this query.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(post_type) = &self.post_type {
            if &record.post_type != post_type {
                return false;
            }
        }

        if let Some(search) = &self.search {
            if !search_terms(search).iter().all(|term| text_contains(record, term)) {
                return false;
            }
        }

        self.meta.iter().all(|clause| clause.matches(record))
            && self
                .tax
                .iter()
                .all(|clause| record.has_term(&clause.taxonomy, &clause.slug))
    }
}

/// Splits a search string into lowercase terms; quoted phrases stay whole.
pub fn search_terms(search: &str) -> Vec<String> {
    SEARCH_TERM
        .captures_iter(search)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

fn text_contains(record: &Record, term: &str) -> bool {
    record.title.to_lowercase().contains(term)
        || record.content.to_lowercase().contains(term)
        || record
            .excerpt
            .as_deref()
            .is_some_and(|excerpt| excerpt.to_lowercase().contains(term))
}

/// Single-pass sequence of query results.
#[derive(Debug)]
pub struct Matches {
    inner: std::vec::IntoIter<Record>,
}

impl Matches {
    pub(crate) fn new(records: Vec<Record>) -> Self {
        Self {
            inner: records.into_iter(),
        }
    }
}

impl Iterator for Matches {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Matches {}

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub type RecordId = u64;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// A classification term (author, publisher, ...) referenced by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub slug: String,
    pub name: String,
}

/// A term together with how many records reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: Term,
    pub count: usize,
}

/// A stored content record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta: BTreeMap<String, String>,
    pub terms: BTreeMap<String, Vec<Term>>,
}

impl Record {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// First term of a taxonomy, for single-select classifications.
    pub fn term(&self, taxonomy: &str) -> Option<&Term> {
        self.terms.get(taxonomy).and_then(|terms| terms.first())
    }

    pub fn has_term(&self, taxonomy: &str, slug: &str) -> bool {
        self.terms
            .get(taxonomy)
            .is_some_and(|terms| terms.iter().any(|term| term.slug == slug))
    }

    /// The manual excerpt when one is set, otherwise the first `words`
    /// words of the tag-stripped content.
    pub fn excerpt(&self, words: usize) -> String {
        if let Some(excerpt) = self.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
            return excerpt.trim().to_string();
        }

        let text = TAG.replace_all(&self.content, " ");
        let mut parts = text.split_whitespace();
        let head: Vec<&str> = parts.by_ref().take(words).collect();
        let mut excerpt = head.join(" ");
        if parts.next().is_some() {
            excerpt.push('…');
        }
        excerpt
    }
}

/// Input for [`crate::RecordStore::insert`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRecord {
    pub post_type: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<Term>>,
}

impl NewRecord {
    pub fn new(post_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            post_type: post_type.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn term(
        mut self,
        taxonomy: impl Into<String>,
        slug: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.terms.entry(taxonomy.into()).or_default().push(Term {
            slug: slug.into(),
            name: name.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str, excerpt: Option<&str>) -> Record {
        Record {
            id: 1,
            post_type: "book".to_string(),
            title: "Title".to_string(),
            content: content.to_string(),
            excerpt: excerpt.map(str::to_string),
            meta: BTreeMap::new(),
            terms: BTreeMap::new(),
        }
    }

    #[test]
    fn manual_excerpt_wins() {
        let record = record("long body text", Some(" Short blurb "));
        assert_eq!(record.excerpt(2), "Short blurb");
    }

    #[test]
    fn generated_excerpt_strips_tags_and_truncates() {
        let record = record("<p>One <em>two</em> three four</p>", None);
        assert_eq!(record.excerpt(2), "One two…");
        assert_eq!(record.excerpt(10), "One two three four");
    }

    #[test]
    fn term_lookup_by_slug() {
        let new = NewRecord::new("book", "Foundation").term("author", "asimov", "Isaac Asimov");
        let record = Record {
            id: 1,
            post_type: new.post_type,
            title: new.title,
            content: new.content,
            excerpt: None,
            meta: new.meta,
            terms: new.terms,
        };

        assert!(record.has_term("author", "asimov"));
        assert!(!record.has_term("author", "herbert"));
        assert_eq!(record.term("author").map(|t| t.name.as_str()), Some("Isaac Asimov"));
    }
}

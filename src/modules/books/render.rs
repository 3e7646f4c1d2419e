//! Result renderer: one escaped fragment per matched book.

use std::fmt::Write;

use shelf_db::Record;
use shelf_http::html::escape;
use shelf_kernel::settings::SearchSettings;

use super::models::Book;
use super::registration::BOOK;

pub struct ResultRenderer {
    excerpt_words: usize,
    currency_symbol: String,
}

impl ResultRenderer {
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            excerpt_words: settings.excerpt_words,
            currency_symbol: settings.currency_symbol.clone(),
        }
    }

    pub fn price(&self, price: Option<f64>) -> String {
        match price {
            Some(amount) => format!("{}{:.2}", self.currency_symbol, amount),
            None => "n/a".to_string(),
        }
    }

    pub fn book(&self, book: &Book) -> String {
        let rating = book
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "n/a".to_string());

        format!(
            "<div class=\"book-item\">\
             <h2>{}</h2>\
             <p class=\"book-excerpt\">{}</p>\
             <p class=\"book-price\">Price: {}</p>\
             <p class=\"book-rating\">Rating: {}</p>\
             </div>\n",
            escape(&book.title),
            escape(&book.excerpt),
            escape(&self.price(book.price)),
            escape(&rating),
        )
    }

    /// All matches in order, or a single "no results" fragment.
    pub fn results(&self, records: impl IntoIterator<Item = Record>) -> String {
        let mut out = String::new();
        for record in records {
            out.push_str(&self.book(&Book::from_record(&record, self.excerpt_words)));
        }

        if out.is_empty() {
            let _ = writeln!(
                out,
                "<p class=\"book-search-empty\">{}</p>",
                escape(BOOK.labels.not_found)
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::modules::books::models::{PRICE_META_KEY, RATING_META_KEY};

    fn record(title: &str, rating: &str, price: &str) -> Record {
        let mut meta = BTreeMap::new();
        meta.insert(RATING_META_KEY.to_string(), rating.to_string());
        meta.insert(PRICE_META_KEY.to_string(), price.to_string());
        Record {
            id: 1,
            post_type: "book".to_string(),
            title: title.to_string(),
            content: "one two three four five six".to_string(),
            excerpt: None,
            meta,
            terms: BTreeMap::new(),
        }
    }

    fn renderer() -> ResultRenderer {
        ResultRenderer::new(&SearchSettings {
            excerpt_words: 3,
            ..SearchSettings::default()
        })
    }

    #[test]
    fn renders_title_excerpt_price_and_rating() {
        let html = renderer().results(vec![record("Foundation", "5", "10")]);
        assert!(html.contains("<h2>Foundation</h2>"));
        assert!(html.contains("<p class=\"book-excerpt\">one two three…</p>"));
        assert!(html.contains("Price: $10.00"));
        assert!(html.contains("Rating: 5"));
        assert!(!html.contains("book-search-empty"));
    }

    #[test]
    fn escapes_every_field() {
        let html = renderer().results(vec![record("<script>x</script>", "5", "10")]);
        assert!(html.contains("<h2>&lt;script&gt;x&lt;/script&gt;</h2>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn missing_numbers_render_placeholder() {
        let html = renderer().results(vec![record("Draft", "", "free")]);
        assert!(html.contains("Price: n/a"));
        assert!(html.contains("Rating: n/a"));
    }

    #[test]
    fn empty_results_render_exactly_one_notice() {
        let html = renderer().results(Vec::new());
        assert_eq!(html.matches("book-search-empty").count(), 1);
        assert_eq!(html.matches("book-item").count(), 0);
        assert!(html.contains("No books found."));
    }
}

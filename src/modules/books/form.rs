//! Embeddable search form.

use std::fmt::Write;

use shelf_db::TermCount;
use shelf_http::html::escape;
use shelf_kernel::settings::SearchSettings;

use super::models::{SearchParams, POST_TYPE};
use super::registration::{TaxonomyConfig, AUTHOR, BOOK, PUBLISHER};
use crate::utils::present;

/// Endpoint the client script submits to for in-place updates.
pub const FRAGMENT_ENDPOINT: &str = "/api/books/search";

/// What the form needs to render: the current submission and the terms
/// offered by the selectors.
pub struct FormContext<'a> {
    pub params: &'a SearchParams,
    pub authors: &'a [TermCount],
    pub publishers: &'a [TermCount],
}

pub struct FormRenderer {
    price_max: u32,
    price_default: u32,
    currency_symbol: String,
}

impl FormRenderer {
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            price_max: settings.price_max,
            price_default: settings.price_default.min(settings.price_max),
            currency_symbol: settings.currency_symbol.clone(),
        }
    }

    /// Slider position: the submitted price rounded to a whole step and
    /// clamped to the slider range. Non-numeric input falls back to the default.
    fn price_value(&self, params: &SearchParams) -> u32 {
        present(params.price.as_deref())
            .and_then(|price| price.trim().parse::<f64>().ok())
            .filter(|price| price.is_finite())
            .map(|price| price.round().clamp(0.0, f64::from(self.price_max)) as u32)
            .unwrap_or(self.price_default)
    }

    pub fn render(&self, ctx: &FormContext<'_>) -> String {
        let params = ctx.params;
        let search = params.s.as_deref().map(escape).unwrap_or_default();
        let price = self.price_value(params);

        let mut out = String::new();
        out.push_str("<link rel=\"stylesheet\" href=\"/assets/book-search.css\">\n");
        let _ = writeln!(
            out,
            "<form role=\"search\" method=\"get\" action=\"/\" id=\"searchform\" \
             class=\"book-search-form\" aria-label=\"{}\" data-endpoint=\"{}\">",
            escape(BOOK.labels.search_items),
            FRAGMENT_ENDPOINT,
        );
        out.push_str("<div>\n<div class=\"ba-a--wrap\">\n");
        let _ = writeln!(
            out,
            "<div><label for=\"s\">{} Name:</label>\
             <input class=\"wbc-input\" type=\"text\" value=\"{}\" name=\"s\" id=\"s\"></div>",
            escape(BOOK.labels.singular_name),
            search,
        );
        term_select(&mut out, &AUTHOR, ctx.authors, params.author.as_deref());
        out.push_str("</div>\n<div class=\"ba-a--wrap\">\n");
        term_select(&mut out, &PUBLISHER, ctx.publishers, params.publisher.as_deref());
        let _ = writeln!(
            out,
            "<div><label for=\"price\">Price ({}):</label>\
             <input type=\"range\" name=\"price\" id=\"price\" min=\"0\" max=\"{}\" step=\"1\" value=\"{}\"></div>",
            escape(&self.currency_symbol),
            self.price_max,
            price,
        );
        out.push_str("</div>\n");
        let _ = writeln!(
            out,
            "<div id=\"price_display\">Selected Price: <span id=\"price_value\">{price}</span></div>"
        );
        rating_select(&mut out, params.rating.as_deref());
        let _ = writeln!(
            out,
            "<input type=\"hidden\" name=\"post_type\" value=\"{POST_TYPE}\"><br>\n\
             <input type=\"submit\" class=\"wbc-btn\" id=\"searchsubmit\" value=\"Search\">"
        );
        out.push_str("</div>\n</form>\n<div id=\"book-results\"></div>\n");
        out.push_str(
            "<script>\ndocument.getElementById('price').addEventListener('input', function () {\n    \
             document.getElementById('price_value').textContent = this.value;\n});\n</script>\n",
        );
        out.push_str("<script src=\"/assets/book-search.js\" defer></script>\n");
        out
    }
}

fn term_select(out: &mut String, taxonomy: &TaxonomyConfig, terms: &[TermCount], selected: Option<&str>) {
    let selected = present(selected);
    let _ = write!(
        out,
        "<div><label for=\"{name}\">{label}:</label>\
         <select name=\"{name}\" id=\"{name}\" class=\"postform\">\
         <option value=\"\">{all}</option>",
        name = taxonomy.name,
        label = escape(taxonomy.labels.singular_name),
        all = escape(taxonomy.labels.all_items),
    );
    for TermCount { term, .. } in terms.iter().filter(|t| t.count > 0) {
        let marker = if selected.as_deref() == Some(term.slug.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            escape(&term.slug),
            marker,
            escape(&term.name),
        );
    }
    out.push_str("</select></div>\n");
}

fn rating_select(out: &mut String, selected: Option<&str>) {
    let selected = present(selected);
    out.push_str(
        "<label for=\"rating\">Rating:</label>\
         <select class=\"wbc-input\" name=\"rating\" id=\"rating\">\
         <option value=\"\">All Ratings</option>",
    );
    for rating in 1..=5 {
        let value = rating.to_string();
        let marker = if selected.as_deref() == Some(value.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(out, "<option value=\"{value}\"{marker}>{value}</option>");
    }
    out.push_str("</select>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_db::Term;

    fn term(slug: &str, name: &str, count: usize) -> TermCount {
        TermCount {
            term: Term {
                slug: slug.to_string(),
                name: name.to_string(),
            },
            count,
        }
    }

    fn render(params: &SearchParams) -> String {
        let authors = vec![term("asimov", "Isaac Asimov", 2), term("nobody", "Nobody", 0)];
        let publishers = vec![term("gnome", "Gnome & Co", 1)];
        FormRenderer::new(&SearchSettings::default()).render(&FormContext {
            params,
            authors: &authors,
            publishers: &publishers,
        })
    }

    #[test]
    fn renders_all_fields_and_results_container() {
        let html = render(&SearchParams::default());
        for needle in [
            "name=\"s\"",
            "name=\"author\"",
            "name=\"publisher\"",
            "type=\"range\" name=\"price\" id=\"price\" min=\"0\" max=\"1000\" step=\"1\" value=\"500\"",
            "name=\"rating\"",
            "<input type=\"hidden\" name=\"post_type\" value=\"book\">",
            "<div id=\"book-results\"></div>",
            "<option value=\"\">All Authors</option>",
            "<option value=\"\">All Publishers</option>",
            "<option value=\"\">All Ratings</option>",
            "data-endpoint=\"/api/books/search\"",
            "price_value').textContent = this.value",
        ] {
            assert!(html.contains(needle), "missing {needle}");
        }
        assert!(html.contains("Gnome &amp; Co"));
        assert!(!html.contains("Nobody"));
    }

    #[test]
    fn reflects_current_submission() {
        let params = SearchParams {
            s: Some("\"><script>".to_string()),
            author: Some("asimov".to_string()),
            rating: Some("4".to_string()),
            price: Some("120".to_string()),
            ..SearchParams::default()
        };
        let html = render(&params);

        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(html.contains("<option value=\"asimov\" selected>Isaac Asimov</option>"));
        assert!(html.contains("<option value=\"4\" selected>4</option>"));
        assert!(html.contains("<span id=\"price_value\">120</span>"));
    }

    #[test]
    fn submitted_price_is_rounded_and_clamped() {
        let slider = |price: &str| {
            render(&SearchParams {
                price: Some(price.to_string()),
                ..SearchParams::default()
            })
        };

        assert!(slider("20.4").contains("<span id=\"price_value\">20</span>"));
        assert!(slider("20.5").contains("<span id=\"price_value\">21</span>"));
        assert!(slider("5000").contains("<span id=\"price_value\">1000</span>"));
        assert!(slider("cheap").contains("<span id=\"price_value\">500</span>"));
        assert!(slider("inf").contains("<span id=\"price_value\">500</span>"));
    }
}

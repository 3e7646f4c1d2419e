//! Filter builder: raw search parameters to a normalized filter spec, and
//! from there to store predicates.

use std::fmt::Display;
use std::str::FromStr;

use shelf_db::{Compare, MetaClause, Query, TaxClause};
use shelf_kernel::settings::PriceMatch;

use super::models::{
    SearchParams, AUTHOR_TAXONOMY, POST_TYPE, PRICE_META_KEY, PUBLISHER_TAXONOMY, RATING_META_KEY,
};
use crate::utils::{present, sanitize_text_field};

/// A numeric request value. Input that does not parse is kept so the
/// predicate still applies; the store never matches it.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric<T> {
    Value(T),
    Unparsable(String),
}

impl<T: FromStr> Numeric<T> {
    fn parse(raw: String) -> Self {
        match raw.parse() {
            Ok(value) => Numeric::Value(value),
            Err(_) => Numeric::Unparsable(raw),
        }
    }
}

impl Numeric<f64> {
    /// `inf` and `NaN` parse as floats but are not prices.
    fn parse_finite(raw: String) -> Self {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Numeric::Value(value),
            _ => Numeric::Unparsable(raw),
        }
    }
}

impl<T: Display> Numeric<T> {
    /// Operand handed to the store's numeric comparison.
    pub fn operand(&self) -> String {
        match self {
            Numeric::Value(value) => value.to_string(),
            Numeric::Unparsable(raw) => raw.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBound {
    pub compare: PriceMatch,
    pub amount: Numeric<f64>,
}

/// Normalized predicates of one search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub text: Option<String>,
    pub author_slug: Option<String>,
    pub publisher_slug: Option<String>,
    pub rating_equals: Option<Numeric<i64>>,
    pub price: Option<PriceBound>,
}

impl FilterSpec {
    /// Every parameter is sanitized; absent or empty parameters add no predicate.
    pub fn from_params(params: &SearchParams, price_match: PriceMatch) -> Self {
        Self {
            text: params
                .s
                .as_deref()
                .map(sanitize_text_field)
                .filter(|text| !text.is_empty()),
            author_slug: present(params.author.as_deref()),
            publisher_slug: present(params.publisher.as_deref()),
            rating_equals: present(params.rating.as_deref()).map(Numeric::parse),
            price: present(params.price.as_deref()).map(|raw| PriceBound {
                compare: price_match,
                amount: Numeric::parse_finite(raw),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Install this spec's predicates on `query`. The query becomes a search
    /// (blank when there is no text) so text matching stays on one path.
    pub fn apply(&self, query: &mut Query) {
        query.search = Some(self.text.clone().unwrap_or_default());

        if let Some(rating) = &self.rating_equals {
            query
                .meta
                .push(MetaClause::numeric(RATING_META_KEY, Compare::Eq, rating.operand()));
        }

        if let Some(price) = &self.price {
            let compare = match price.compare {
                PriceMatch::AtMost => Compare::Le,
                PriceMatch::Exact => Compare::Eq,
            };
            query
                .meta
                .push(MetaClause::numeric(PRICE_META_KEY, compare, price.amount.operand()));
        }

        if let Some(slug) = &self.author_slug {
            query.tax.push(TaxClause::slug(AUTHOR_TAXONOMY, slug));
        }

        if let Some(slug) = &self.publisher_slug {
            query.tax.push(TaxClause::slug(PUBLISHER_TAXONOMY, slug));
        }
    }

    /// A fresh book query carrying this spec.
    pub fn to_query(&self) -> Query {
        let mut query = Query::for_post_type(POST_TYPE);
        self.apply(&mut query);
        query
    }
}

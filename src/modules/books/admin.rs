//! Admin surface for the two book attributes: rating and price.

use std::fmt::Write;

use serde_json::json;
use shelf_db::{Record, RecordId, RecordStore};
use shelf_http::{error::AppError, html::escape};

use super::models::{AdminMetaForm, POST_TYPE};
use super::registration::{MetaFieldConfig, PRICE_FIELD, RATING_FIELD};
use crate::utils::sanitize_text_field;

/// Validated values ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaUpdate {
    pub rating: String,
    pub price: String,
}

/// Meta boxes for `record`, wrapped in a form posting back to the same path.
pub fn render_meta_boxes(record: &Record) -> String {
    let stored_rating = record.meta(RATING_FIELD.key).unwrap_or_default().trim();
    let stored_price = record.meta(PRICE_FIELD.key).unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "<form method=\"post\" action=\"/api/books/admin/{}/meta\" class=\"book-meta\">",
        record.id
    );

    open_box(&mut out, &RATING_FIELD);
    let _ = write!(
        out,
        "<select name=\"{field}\" id=\"{field}\" class=\"postbox\">",
        field = RATING_FIELD.field
    );
    for rating in 1..=5 {
        let value = rating.to_string();
        let marker = if stored_rating == value { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{value}\"{marker}>{value}</option>");
    }
    out.push_str("</select></div>\n");

    open_box(&mut out, &PRICE_FIELD);
    let _ = writeln!(
        out,
        "<input type=\"text\" name=\"{field}\" id=\"{field}\" value=\"{}\" class=\"postbox\"></div>",
        escape(stored_price),
        field = PRICE_FIELD.field
    );

    out.push_str("<input type=\"submit\" value=\"Update\">\n</form>\n");
    out
}

fn open_box(out: &mut String, field: &MetaFieldConfig) {
    let _ = write!(
        out,
        "<div class=\"postbox\" id=\"{id}\"><h2>{title}</h2><label for=\"{field}\">{label}</label>",
        id = field.field.trim_end_matches("_field"),
        title = escape(field.title),
        field = field.field,
        label = escape(field.label),
    );
}

/// Sanitize and validate a submission. `Ok(None)` means a field was
/// missing and nothing should change.
pub fn validate(form: &AdminMetaForm) -> Result<Option<MetaUpdate>, AppError> {
    let (Some(rating), Some(price)) = (&form.book_rating_field, &form.book_price_field) else {
        return Ok(None);
    };

    let rating = sanitize_text_field(rating).parse::<u8>().ok().filter(|r| (1..=5).contains(r));
    let price = sanitize_text_field(price)
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0);

    match (rating, price) {
        // Stored in canonical form so the meta box can select it again.
        (Some(rating), Some(price)) => Ok(Some(MetaUpdate {
            rating: rating.to_string(),
            price: price.to_string(),
        })),
        (rating, price) => {
            let mut details = Vec::new();
            if rating.is_none() {
                details.push(json!({ "field": RATING_FIELD.field, "error": "must be an integer from 1 to 5" }));
            }
            if price.is_none() {
                details.push(json!({ "field": PRICE_FIELD.field, "error": "must be a number of at least 0" }));
            }
            Err(AppError::validation(details, "invalid book attributes"))
        }
    }
}

/// Load a book for the admin surface; other post types are not found.
pub async fn load_book(store: &dyn RecordStore, id: RecordId) -> Result<Record, AppError> {
    store
        .get(id)
        .await?
        .filter(|record| record.post_type == POST_TYPE)
        .ok_or_else(|| AppError::not_found(format!("book {id} not found")))
}

/// Persist a submission. Returns whether anything was written.
pub async fn save(store: &dyn RecordStore, id: RecordId, form: &AdminMetaForm) -> Result<bool, AppError> {
    load_book(store, id).await?;

    let Some(update) = validate(form)? else {
        tracing::debug!(book = id, "meta submission incomplete; nothing saved");
        return Ok(false);
    };

    store.update_meta(id, RATING_FIELD.key, &update.rating).await?;
    store.update_meta(id, PRICE_FIELD.key, &update.price).await?;
    tracing::info!(book = id, rating = %update.rating, price = %update.price, "book attributes saved");
    Ok(true)
}

//! Content registration for the books module, kept as static records.

use shelf_db::{RecordStore, StoreError};

use super::models::{AUTHOR_TAXONOMY, POST_TYPE, PUBLISHER_TAXONOMY};

pub struct PostTypeLabels {
    pub name: &'static str,
    pub singular_name: &'static str,
    pub search_items: &'static str,
    pub not_found: &'static str,
}

pub struct PostTypeConfig {
    pub name: &'static str,
    pub labels: PostTypeLabels,
}

pub struct TaxonomyLabels {
    pub name: &'static str,
    pub singular_name: &'static str,
    pub all_items: &'static str,
}

pub struct TaxonomyConfig {
    pub name: &'static str,
    pub post_types: &'static [&'static str],
    pub labels: TaxonomyLabels,
}

pub struct MetaFieldConfig {
    pub key: &'static str,
    /// Form field name on the admin surface
    pub field: &'static str,
    pub title: &'static str,
    pub label: &'static str,
}

pub const BOOK: PostTypeConfig = PostTypeConfig {
    name: POST_TYPE,
    labels: PostTypeLabels {
        name: "Books",
        singular_name: "Book",
        search_items: "Search Books",
        not_found: "No books found.",
    },
};

pub const AUTHOR: TaxonomyConfig = TaxonomyConfig {
    name: AUTHOR_TAXONOMY,
    post_types: &[POST_TYPE],
    labels: TaxonomyLabels {
        name: "Authors",
        singular_name: "Author",
        all_items: "All Authors",
    },
};

pub const PUBLISHER: TaxonomyConfig = TaxonomyConfig {
    name: PUBLISHER_TAXONOMY,
    post_types: &[POST_TYPE],
    labels: TaxonomyLabels {
        name: "Publishers",
        singular_name: "Publisher",
        all_items: "All Publishers",
    },
};

pub const TAXONOMIES: [&TaxonomyConfig; 2] = [&AUTHOR, &PUBLISHER];

pub const RATING_FIELD: MetaFieldConfig = MetaFieldConfig {
    key: super::models::RATING_META_KEY,
    field: "book_rating_field",
    title: "Book Rating",
    label: "Rating (1 to 5):",
};

pub const PRICE_FIELD: MetaFieldConfig = MetaFieldConfig {
    key: super::models::PRICE_META_KEY,
    field: "book_price_field",
    title: "Book Price",
    label: "Price ($):",
};

/// Register the book post type and its taxonomies with the store.
pub async fn register(store: &dyn RecordStore) -> Result<(), StoreError> {
    store.register_post_type(BOOK.name).await?;
    for taxonomy in TAXONOMIES {
        store
            .register_taxonomy(taxonomy.name, taxonomy.post_types)
            .await?;
        tracing::debug!(taxonomy = taxonomy.name, label = taxonomy.labels.name, "taxonomy registered");
    }
    tracing::info!(post_type = BOOK.name, label = BOOK.labels.name, "content types registered");
    Ok(())
}

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;
use shelf_app::modules::books::models::{
    AUTHOR_TAXONOMY, POST_TYPE, PRICE_META_KEY, PUBLISHER_TAXONOMY, RATING_META_KEY,
};
use shelf_db::{MemoryStore, NewRecord, RecordId, RecordStore};
use shelf_kernel::settings::{PriceMatch, Settings};

struct App {
    server: TestServer,
    store: Arc<dyn RecordStore>,
    book1: RecordId,
}

/// Book1 (rating 5, price 10) and Book2 (rating 3, price 50), both by asimov.
async fn app(price_match: PriceMatch) -> App {
    let mut settings = Settings::default();
    settings.search.price_match = price_match;

    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let router = shelf_app::build_app(&settings, store.clone()).await.unwrap();

    let book1 = store
        .insert(
            NewRecord::new(POST_TYPE, "Book1")
                .content("A first book about robots.")
                .meta(RATING_META_KEY, "5")
                .meta(PRICE_META_KEY, "10")
                .term(AUTHOR_TAXONOMY, "asimov", "Isaac Asimov")
                .term(PUBLISHER_TAXONOMY, "gnome", "Gnome Press"),
        )
        .await
        .unwrap();
    store
        .insert(
            NewRecord::new(POST_TYPE, "Book2")
                .content("A second book about empires.")
                .meta(RATING_META_KEY, "3")
                .meta(PRICE_META_KEY, "50")
                .term(AUTHOR_TAXONOMY, "asimov", "Isaac Asimov"),
        )
        .await
        .unwrap();

    App {
        server: TestServer::new(router).unwrap(),
        store,
        book1,
    }
}

async fn fragment(app: &App, params: &[(&str, &str)]) -> String {
    let mut request = app
        .server
        .get("/api/books/search")
        .add_query_param("action", "book_search");
    for &(key, value) in params {
        request = request.add_query_param(key, value);
    }
    let response = request.await;
    response.assert_status_ok();
    response.text()
}

#[tokio::test]
async fn fragment_path_scenario() {
    let app = app(PriceMatch::AtMost).await;

    let html = fragment(&app, &[("rating", "5")]).await;
    assert!(html.contains("<h2>Book1</h2>"));
    assert!(!html.contains("Book2"));

    let html = fragment(&app, &[("price", "20")]).await;
    assert!(html.contains("<h2>Book1</h2>"));
    assert!(!html.contains("Book2"));

    let html = fragment(&app, &[("author", "asimov"), ("price", "60")]).await;
    let (book1, book2) = (html.find("Book1").unwrap(), html.find("Book2").unwrap());
    assert!(book2 < book1, "newest first");

    let html = fragment(&app, &[("rating", "1")]).await;
    assert_eq!(html.matches("book-search-empty").count(), 1);
    assert_eq!(html.matches("book-item").count(), 0);
}

#[tokio::test]
async fn empty_filters_return_whole_catalog() {
    let app = app(PriceMatch::AtMost).await;
    let html = fragment(&app, &[("s", ""), ("author", ""), ("rating", ""), ("price", "")]).await;
    assert_eq!(html.matches("book-item").count(), 2);
}

#[tokio::test]
async fn fragment_matches_free_text() {
    let app = app(PriceMatch::AtMost).await;

    let html = fragment(&app, &[("s", "robots")]).await;
    assert!(html.contains("<h2>Book1</h2>"));
    assert!(!html.contains("Book2"));

    let html = fragment(&app, &[("s", "ROBOTS"), ("rating", "3")]).await;
    assert!(html.contains("book-search-empty"));
}

#[tokio::test]
async fn author_and_publisher_combine() {
    let app = app(PriceMatch::AtMost).await;
    let html = fragment(&app, &[("author", "asimov"), ("publisher", "gnome")]).await;
    assert!(html.contains("Book1"));
    assert!(!html.contains("Book2"));
}

#[tokio::test]
async fn fragment_requires_search_action() {
    let app = app(PriceMatch::AtMost).await;

    let response = app.server.get("/api/books/search").add_query_param("rating", "5").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");

    let response = app
        .server
        .get("/api/books/search")
        .add_query_param("action", "other")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn page_path_applies_filters_to_main_query() {
    let app = app(PriceMatch::AtMost).await;

    let page = app
        .server
        .get("/")
        .add_query_param("post_type", "book")
        .add_query_param("s", "")
        .add_query_param("price", "20")
        .await
        .text();
    assert!(page.contains("id=\"searchform\""));
    assert!(page.contains("<h3>Book1</h3>"));
    assert!(!page.contains("<h3>Book2</h3>"));

    let page = app
        .server
        .get("/")
        .add_query_param("post_type", "book")
        .add_query_param("s", "empires")
        .await
        .text();
    assert!(page.contains("<h3>Book2</h3>"));
    assert!(!page.contains("<h3>Book1</h3>"));
}

#[tokio::test]
async fn exact_price_policy_applies_to_both_paths() {
    let app = app(PriceMatch::Exact).await;

    let html = fragment(&app, &[("price", "10")]).await;
    assert!(html.contains("Book1"));
    let html = fragment(&app, &[("price", "20")]).await;
    assert!(html.contains("book-search-empty"));

    let page = app
        .server
        .get("/")
        .add_query_param("post_type", "book")
        .add_query_param("s", "")
        .add_query_param("price", "50")
        .await
        .text();
    assert!(page.contains("<h3>Book2</h3>"));
    assert!(!page.contains("<h3>Book1</h3>"));
}

#[tokio::test]
async fn json_listing_uses_the_same_filters() {
    let app = app(PriceMatch::AtMost).await;

    let books: Value = app.server.get("/api/books").add_query_param("rating", "3").await.json();
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Book2");
    assert_eq!(books[0]["price"], 50.0);
    assert_eq!(books[0]["author"]["slug"], "asimov");
}

#[tokio::test]
async fn admin_meta_round_trip() {
    let app = app(PriceMatch::AtMost).await;
    let path = format!("/api/books/admin/{}/meta", app.book1);

    let page = app.server.get(&path).await.text();
    assert!(page.contains("<option value=\"5\" selected>5</option>"));
    assert!(page.contains("name=\"book_price_field\""));

    let body: Value = app
        .server
        .post(&path)
        .form(&vec![("book_rating_field", "4"), ("book_price_field", "12.5")])
        .await
        .json();
    assert_eq!(body["updated"], true);

    let record = app.store.get(app.book1).await.unwrap().unwrap();
    assert_eq!(record.meta(RATING_META_KEY), Some("4"));
    assert_eq!(record.meta(PRICE_META_KEY), Some("12.5"));

    let body: Value = app
        .server
        .post(&path)
        .form(&vec![("book_rating_field", "2")])
        .await
        .json();
    assert_eq!(body["updated"], false);
}

#[tokio::test]
async fn admin_rejects_bad_input() {
    let app = app(PriceMatch::AtMost).await;
    let path = format!("/api/books/admin/{}/meta", app.book1);

    let response = app
        .server
        .post(&path)
        .form(&vec![("book_rating_field", "9"), ("book_price_field", "10")])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");

    app.server
        .get("/api/books/admin/999/meta")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_assets_are_served() {
    let app = app(PriceMatch::AtMost).await;

    let script = app.server.get("/assets/book-search.js").await;
    script.assert_status_ok();
    assert!(script.text().contains("Error retrieving books. Please try again."));

    app.server.get("/assets/book-search.css").await.assert_status_ok();

    let docs: Value = app.server.get("/docs/openapi.json").await.json();
    assert!(docs["paths"].get("/api/books/search").is_some());
}

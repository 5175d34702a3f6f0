use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{debug, info};

use crate::catalog::Category;
use crate::fetch;
use crate::parser;

/// Flat accumulators spanning the whole crawl. Titles, prices and ratings
/// are correlated by position across the entire run, not grouped per tile;
/// a page with mismatched element counts desynchronizes everything after
/// it.
pub struct RawColumns {
    pub titles: Vec<String>,
    pub prices: Vec<String>,
    pub ratings: Vec<u8>,
}

pub struct CrawlStats {
    pub categories: usize,
    pub books: usize,
}

/// Fetch each category's first listing page in list order, one request at a
/// time, and append the extracted fields to the run-wide columns. A fetch
/// failure aborts the whole crawl.
pub async fn crawl(
    client: &Client,
    base_url: &str,
    categories: &[Category],
) -> Result<(RawColumns, CrawlStats)> {
    let pb = ProgressBar::new(categories.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut columns = RawColumns {
        titles: Vec::new(),
        prices: Vec::new(),
        ratings: Vec::new(),
    };

    for category in categories {
        let url = category.index_url(base_url);
        pb.set_message(category.name.clone());

        let html = fetch::fetch_text(client, &url).await?;
        let fields = parser::extract_fields(&html);
        debug!(
            category = %category.name,
            titles = fields.titles.len(),
            prices = fields.prices.len(),
            ratings = fields.ratings.len(),
            "extracted listing page"
        );

        columns.titles.extend(fields.titles);
        columns.prices.extend(fields.prices);
        columns.ratings.extend(fields.ratings);
        pb.inc(1);
    }

    pb.finish_and_clear();
    let stats = CrawlStats {
        categories: categories.len(),
        books: columns.titles.len(),
    };
    info!(
        "Crawled {} categories, {} book tiles",
        stats.categories, stats.books
    );
    Ok((columns, stats))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::catalog::all_categories;
    use crate::table::{self, PriceRange, RatingCategory};

    /// Stub catalog server; any path it does not know returns a bare 404
    /// page with no product tiles.
    fn spawn_stub_server() -> (String, mpsc::Sender<()>, thread::JoinHandle<()>) {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let path = request.url().to_string();
            let (status, body) = match path.as_str() {
                "/catalogue/category/books/travel_2/index.html" => (
                    200,
                    std::fs::read_to_string("tests/fixtures/travel.html").unwrap(),
                ),
                _ => (404, "<html><body><h1>404 Not Found</h1></body></html>".to_string()),
            };

            let _ = request.respond(
                tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(
                        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..])
                            .unwrap(),
                    ),
            );
        });

        (base_url, shutdown_tx, handle)
    }

    #[tokio::test]
    async fn single_category_end_to_end() {
        let (base_url, shutdown, handle) = spawn_stub_server();

        let categories = &all_categories()[..1];
        let client = fetch::client().unwrap();
        let (columns, stats) = crawl(&client, &base_url, categories).await.unwrap();

        assert_eq!(stats.categories, 1);
        assert_eq!(stats.books, 2);

        let table = table::build_table(columns).unwrap();
        assert_eq!(table.len(), 2);

        let a = &table.rows()[0];
        assert_eq!(a.name, "Book A");
        assert_eq!(a.price, Some(10.0));
        assert_eq!(a.rating, 2);
        assert_eq!(a.price_range, Some(PriceRange::Cheap));
        assert_eq!(a.rating_category, RatingCategory::Low);

        let b = &table.rows()[1];
        assert_eq!(b.name, "Book B");
        assert_eq!(b.price, Some(50.0));
        assert_eq!(b.rating, 5);
        assert_eq!(b.price_range, Some(PriceRange::Expensive));
        assert_eq!(b.rating_category, RatingCategory::High);

        let _ = shutdown.send(());
        let _ = handle.join();
    }

    #[tokio::test]
    async fn missing_category_page_contributes_no_rows() {
        // There is no status-code gate: a 404 body is parsed like any
        // other page and simply yields zero tiles.
        let (base_url, shutdown, handle) = spawn_stub_server();

        let categories = &all_categories()[..2];
        let client = fetch::client().unwrap();
        let (columns, stats) = crawl(&client, &base_url, categories).await.unwrap();

        assert_eq!(stats.categories, 2);
        assert_eq!(stats.books, 2);
        assert_eq!(columns.titles.len(), 2);
        assert_eq!(columns.prices.len(), 2);
        assert_eq!(columns.ratings.len(), 2);

        let _ = shutdown.send(());
        let _ = handle.join();
    }
}

use anyhow::{Context, Result};
use reqwest::Client;

const USER_AGENT: &str = concat!("bookscrape/", env!("CARGO_PKG_VERSION"));

pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("build http client")
}

/// One GET, body returned as text. No retry, no status-code gate: a
/// transport failure propagates and ends the run.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let body = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .text()
        .await
        .with_context(|| format!("read body of {url}"))?;
    Ok(body)
}

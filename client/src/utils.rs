use anyhow::{anyhow, Result};
use chain_server::http::HealthResponse;
use common::constants::SERVER_ID;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Server base URL: the explicit flag wins, then `CHAIN_SERVER_URL` (after
/// loading `.env`), then the local default. Trailing slashes are dropped.
pub fn server_url(flag: Option<String>) -> String {
    dotenv::dotenv().ok();
    let url = flag
        .or_else(|| std::env::var("CHAIN_SERVER_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    url.trim_end_matches('/').to_string()
}

/// Fails unless a chain server answers at `url` and identifies itself with
/// the expected server id.
pub async fn health_check(url: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let res = client.get(format!("{}/health", url)).send().await?;
    if !res.status().is_success() {
        return Err(anyhow!("Failed to check health, status: {}", res.status()));
    }

    let health: HealthResponse = res.json().await?;
    if health.id != SERVER_ID {
        return Err(anyhow!("Unexpected server id {} at {}", health.id, url));
    }

    Ok(())
}

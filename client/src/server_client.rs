use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chain::{chunk_count_for_size, file_digest, generate_chain_from_path};
use chain_server::http::{CheckQuery, CheckResponse, FileSummary, IntegrityResponse, ListResponse, SendRequest, SendResponse};
use common::log::{debug, error};

/// Chunks the file at `path` and sends its whole chain in one request.
pub async fn send_file<P: AsRef<Path>>(server_url: &str, path: P) -> Result<SendResponse> {
    let chunks = generate_chain_from_path(path)?;
    debug!("Sending {} chunks to {}", chunks.len(), server_url);

    let client = reqwest::Client::new();
    let url = format!("{}/send", server_url);
    let res = client.post(&url).json(&SendRequest { chunks }).send().await?;
    let status = res.status();
    if !status.is_success() {
        error!("Failed to send file, status: {}", status);
        // warp's own rejections (413, malformed body) are not a SendResponse
        return match res.json::<SendResponse>().await {
            Ok(response) => Err(anyhow!(response.message)),
            Err(_) => Err(anyhow!("Failed to send file, status: {}", status)),
        };
    }

    let response_body: SendResponse = res.json().await?;
    Ok(response_body)
}

/// Asks the server whether the chain of the local file at `path` is stored
/// complete and intact. Only the file's hash and chunk count are sent.
pub async fn check_file<P: AsRef<Path>>(server_url: &str, path: P) -> Result<CheckResponse> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {:?}", path))?;
    let (file_hash, size) = file_digest(BufReader::new(file)).with_context(|| format!("hash {:?}", path))?;
    let query = CheckQuery { file_hash, chunk_count: chunk_count_for_size(size) };

    let client = reqwest::Client::new();
    let url = format!("{}/check", server_url);
    let res = client.get(&url).query(&query).send().await?;
    if !res.status().is_success() {
        error!("Failed to check file, status: {}", res.status());
        return Err(anyhow!("Failed to check file, status: {}", res.status()));
    }

    let response_body: CheckResponse = res.json().await?;
    Ok(response_body)
}

pub async fn check_integrity(server_url: &str) -> Result<bool> {
    let client = reqwest::Client::new();
    let url = format!("{}/check_integrity", server_url);
    let res = client.get(&url).send().await?;
    if !res.status().is_success() {
        error!("Failed to check integrity, status: {}", res.status());
        return Err(anyhow!("Failed to check integrity, status: {}", res.status()));
    }

    let response_body: IntegrityResponse = res.json().await?;
    Ok(response_body.integrity_check)
}

pub async fn list_files(server_url: &str) -> Result<Vec<FileSummary>> {
    let client = reqwest::Client::new();
    let url = format!("{}/files", server_url);
    let res = client.get(&url).send().await?;
    if !res.status().is_success() {
        error!("Failed to list files, status: {}", res.status());
        return Err(anyhow!("Failed to list files, status: {}", res.status()));
    }

    let response_body: ListResponse = res.json().await?;
    Ok(response_body.files)
}

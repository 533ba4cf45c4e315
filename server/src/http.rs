use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use common::constants::SERVER_ID;
use common::log::{info, warn, error};
use common::types::ChunkRecord;
use serde::{Deserialize, Serialize};
use warp::Filter;

use crate::integrity::{check_file, sweep_all_chains};
use crate::storage::ChunkStorage;

/// Upper bound on a `/send` body. Hex doubles the payload size on the wire.
pub const MAX_SEND_BODY_BYTES: u64 = 512 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct SendRequest {
    pub chunks: Vec<ChunkRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendResponse {
    pub success: bool,
    pub new_file: bool,
    pub hash: String,
    pub chunk_count: u64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckQuery {
    pub file_hash: String,
    pub chunk_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub check: bool,
    pub hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntegrityResponse {
    pub integrity_check: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileSummary {
    pub hash: String,
    pub chunks: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub files: Vec<FileSummary>,
}

pub fn routes<T: ChunkStorage + Send + Sync + 'static>(
    storage: Arc<T>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let storage_filter = warp::any().map(move || storage.clone());

    // GET /health - Health check with server identity
    let health_check = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handle_health_check);

    // POST /send - Store the chunk pool of one file
    let send = warp::path("send")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_SEND_BODY_BYTES))
        .and(warp::body::json())
        .and(storage_filter.clone())
        .and_then(handle_send);

    // GET /check?file_hash=..&chunk_count=.. - Verify one stored file
    let check = warp::path("check")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<CheckQuery>())
        .and(storage_filter.clone())
        .and_then(handle_check);

    // GET /check_integrity - Verify every stored file
    let check_integrity = warp::path("check_integrity")
        .and(warp::path::end())
        .and(warp::get())
        .and(storage_filter.clone())
        .and_then(handle_check_integrity);

    // GET /files - List stored files
    let files = warp::path("files")
        .and(warp::path::end())
        .and(warp::get())
        .and(storage_filter.clone())
        .and_then(handle_list);

    health_check
        .or(send)
        .or(check)
        .or(check_integrity)
        .or(files)
        .with(warp::cors().allow_any_origin())
}

/// Binds `addr` (port 0 picks a free port) and returns the bound address
/// with the future that serves requests until dropped.
pub fn bind_server<T: ChunkStorage + Send + Sync + 'static>(
    storage: Arc<T>,
    addr: SocketAddr,
) -> Result<(SocketAddr, impl Future<Output = ()> + 'static)> {
    warp::serve(routes(storage))
        .try_bind_ephemeral(addr)
        .with_context(|| format!("bind {}", addr))
}

pub async fn start_server<T: ChunkStorage + Send + Sync + 'static>(storage: Arc<T>, addr: SocketAddr) -> Result<()> {
    let (bound, server) = bind_server(storage, addr)?;
    info!("🦀 Chain server starting on {}", bound);
    server.await;
    Ok(())
}

async fn handle_health_check() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::with_status(
        warp::reply::json(&HealthResponse {
            id: SERVER_ID.to_string(),
            status: "ok".to_string(),
        }),
        warp::http::StatusCode::OK,
    ))
}

async fn handle_send<T: ChunkStorage + Send + Sync>(
    request: SendRequest,
    storage: Arc<T>,
) -> Result<impl warp::Reply, Infallible> {
    let hash = request.chunks.first().map(|c| c.file_hash.clone()).unwrap_or_default();
    let chunk_count = request.chunks.len() as u64;

    match storage.insert_if_new(request.chunks).await {
        Ok(outcome) => {
            let message = if outcome.stored {
                "Chunks stored successfully"
            } else {
                "File already stored"
            };
            info!("📦 Received {} chunks for file {}: {}", chunk_count, hash, message);

            Ok(warp::reply::with_status(
                warp::reply::json(&SendResponse {
                    success: true,
                    new_file: outcome.stored,
                    hash,
                    chunk_count,
                    message: message.to_string(),
                }),
                warp::http::StatusCode::OK,
            ))
        }
        Err(e) => {
            warn!("Rejected chunk pool for file {:?}: {:#}", hash, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&SendResponse {
                    success: false,
                    new_file: false,
                    hash,
                    chunk_count,
                    message: format!("Failed to store chunks: {:#}", e),
                }),
                warp::http::StatusCode::BAD_REQUEST,
            ))
        }
    }
}

async fn handle_check<T: ChunkStorage + Send + Sync>(
    query: CheckQuery,
    storage: Arc<T>,
) -> Result<impl warp::Reply, Infallible> {
    match check_file(storage.as_ref(), &query.file_hash, query.chunk_count).await {
        Ok(check) => Ok(warp::reply::with_status(
            warp::reply::json(&CheckResponse { check, hash: query.file_hash }),
            warp::http::StatusCode::OK,
        )),
        Err(e) => {
            error!("Failed to check file {}: {:#}", query.file_hash, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({"error": "Internal server error"})),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_check_integrity<T: ChunkStorage + Send + Sync>(
    storage: Arc<T>,
) -> Result<impl warp::Reply, Infallible> {
    match sweep_all_chains(storage.as_ref()).await {
        Ok(integrity_check) => Ok(warp::reply::with_status(
            warp::reply::json(&IntegrityResponse { integrity_check }),
            warp::http::StatusCode::OK,
        )),
        Err(e) => {
            error!("Failed to sweep stored chains: {:#}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({"error": "Internal server error"})),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_list<T: ChunkStorage + Send + Sync>(
    storage: Arc<T>,
) -> Result<impl warp::Reply, Infallible> {
    match storage.buckets().await {
        Ok(buckets) => {
            let files = buckets
                .into_iter()
                .map(|(hash, bucket)| FileSummary { hash, chunks: bucket.len() as u64 })
                .collect();
            Ok(warp::reply::with_status(
                warp::reply::json(&ListResponse { files }),
                warp::http::StatusCode::OK,
            ))
        }
        Err(e) => {
            error!("Failed to list stored files: {:#}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({"error": "Internal server error"})),
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

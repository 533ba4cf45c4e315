use std::sync::Arc;

use anyhow::Result;
use chain_server::{config::ServerConfig, start_server, MemoryStorage};
use common::log::{error, info, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = ServerConfig::from_env().inspect_err(|e| error!("❌ Invalid configuration: {:#}", e))?;
    info!("Loaded config: {:?}", config);

    let storage = Arc::new(MemoryStorage::new());
    start_server(storage, config.addr).await
}

pub mod setup {
    use chain_server::{bind_server, MemoryStorage};
    use common::log::{info, try_init_logging};
    use std::{net::SocketAddr, sync::Arc};
    use tokio::sync::oneshot;

    pub struct ServerHandle {
        pub storage: Arc<MemoryStorage>,
        pub base_url: String,
        _shutdown_tx: oneshot::Sender<()>,
    }

    /// Starts a chain server with an empty store on a free local port. The
    /// server stops when the handle is dropped.
    pub async fn start_chain_server() -> ServerHandle {
        try_init_logging();

        let storage = Arc::new(MemoryStorage::new());
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let (bound, server) = bind_server(storage.clone(), addr).unwrap();

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        // Start the server in the background
        tokio::spawn(async move {
            tokio::select! {
                _ = server => {},
                _ = shutdown_rx => {},
            }
        });

        let base_url = format!("http://{}", bound);
        info!("Chain server for test listening at {}", base_url);

        ServerHandle {
            storage,
            base_url,
            _shutdown_tx: shutdown_tx,
        }
    }
}

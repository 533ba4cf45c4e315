use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
pub use tracing::{info, error, warn, debug, trace};

pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Show only workspace crates, hide external deps
                    "common=info,chain=info,chain_server=info,client=info,tests=info".into()
                })
        )
        .with(
            fmt::Layer::new()
                .with_timer(())
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_target(true)
        )
        .init();
}

/// Like [`init_logging`] but safe to call more than once, for tests that
/// spin up several servers in one process.
pub fn try_init_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::Layer::new().with_test_writer().with_target(true))
        .try_init();
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::routes::{FileStore, Router};

/// Pause after a failed accept, so a persistent error does not spin
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    info!("Listening on {}", cfg.listen_addr);

    let router = Arc::new(Router::new(cfg.directory.clone()));
    serve(listener, router, cfg.request_timeout()).await
}

/// Accepts connections forever, one task per connection.
///
/// Nothing that happens inside a connection task can stop this loop.
pub async fn serve<F: FileStore>(
    listener: TcpListener,
    router: Arc<Router<F>>,
    request_timeout: Duration,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            let conn = Connection::new(socket, router, request_timeout);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

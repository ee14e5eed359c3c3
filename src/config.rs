use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Default budget for reading one request, measured from accept
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

/// Server configuration.
///
/// Every field can be given as a flag or through the environment, e.g.
/// `LISTEN=0.0.0.0:4221 wicket --directory /tmp/files`.
#[derive(Debug, Clone, Parser)]
#[command(name = "wicket")]
#[command(about = "Minimal one-request-per-connection HTTP/1.1 server")]
pub struct Config {
    /// Address the listener binds to
    #[arg(long = "listen", default_value = "127.0.0.1:4221", env = "LISTEN")]
    pub listen_addr: String,

    /// Directory served by the /files routes
    #[arg(long, env = "SERVE_DIR")]
    pub directory: Option<PathBuf>,

    /// Time budget for reading one request, in milliseconds
    #[arg(long = "request-timeout-ms", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS, env = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: u64,
}

impl Config {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

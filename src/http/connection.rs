use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;

use crate::http::parser::{self, ParseError};
use crate::http::reader::SocketReader;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::routes::{DiskStore, FileStore, Router};

/// Serves exactly one request on a stream, then closes it.
///
/// The stream is owned by the connection, so it is released once when
/// `run` returns, whichever way it returns.
pub struct Connection<S, F = DiskStore> {
    reader: SocketReader<S>,
    router: Arc<Router<F>>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S, F> Connection<S, F>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FileStore,
{
    /// Starts the request deadline clock.
    pub fn new(stream: S, router: Arc<Router<F>>, request_timeout: Duration) -> Self {
        let deadline = Instant::now() + request_timeout;

        Self {
            reader: SocketReader::new(stream, deadline),
            router,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match parser::read_request(&mut self.reader).await {
                        Ok(req) => ConnectionState::Processing(req),
                        Err(e) => Self::reject(e),
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = Self::route_isolated(&self.router, req).await;

                    tracing::info!(
                        method = %req.method,
                        target = %req.target,
                        status = response.status.as_u16(),
                        "Request handled"
                    );

                    self.state = ConnectionState::Writing(Self::serialize_isolated(&response));
                }

                ConnectionState::Writing(writer) => {
                    let result = writer.write_to_stream(self.reader.get_mut()).await;
                    self.state = ConnectionState::Closed;
                    result?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        if let Err(e) = self.reader.get_mut().shutdown().await {
            tracing::debug!(error = %e, "Shutdown after response failed");
        }

        Ok(())
    }

    /// Routes on its own task so a panicking handler still yields a 500.
    async fn route_isolated(router: &Arc<Router<F>>, req: &Request) -> Response {
        let router = Arc::clone(router);
        let req = req.clone();

        match tokio::spawn(async move { router.route(&req).await }).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Routing task failed");
                Response::internal_error()
            }
        }
    }

    fn serialize_isolated(response: &Response) -> ResponseWriter {
        panic::catch_unwind(AssertUnwindSafe(|| ResponseWriter::new(response))).unwrap_or_else(
            |_| {
                tracing::error!(status = response.status.as_u16(), "Serializing response failed");
                ResponseWriter::new(&Response::internal_error())
            },
        )
    }

    /// Picks the response for a failed parse, if the peer is still there.
    fn reject(e: ParseError) -> ConnectionState {
        match e.status() {
            Some(status) => {
                tracing::warn!(
                    error = %e,
                    status = status.as_u16(),
                    "Rejecting request"
                );
                ConnectionState::Writing(ResponseWriter::new(&Response::empty(status)))
            }
            None => {
                tracing::debug!(error = %e, "Connection ended before a full request");
                ConnectionState::Closed
            }
        }
    }
}

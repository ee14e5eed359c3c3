//! Request routing.
//!
//! Dispatch looks only at the method and the route segments (the target
//! split on `/` with empty parts dropped):
//!
//! | Method      | Segments          | Outcome                          |
//! |-------------|-------------------|----------------------------------|
//! | GET         | `[]`              | 200, empty body                  |
//! | GET         | `[echo, v]`       | 200, `v` (gzip when accepted)    |
//! | GET         | `[user-agent]`    | 200, the User-Agent value        |
//! | GET         | `[files, name]`   | 200 file bytes / 404 / 500       |
//! | POST        | `[files, name]`   | 201 / 500                        |
//! | GET, POST   | anything else     | 404                              |
//! | PUT, DELETE | anything          | 405                              |
//! | other       | anything          | 400                              |

pub mod files;
mod handlers;

use std::path::{Path, PathBuf};

use crate::http::request::{Method, Request};
use crate::http::response::Response;

pub use files::{DiskStore, FileError, FileStore};

/// Routes requests to the built-in handlers.
///
/// The serving directory is fixed at construction and shared read-only by
/// every connection.
pub struct Router<S = DiskStore> {
    directory: Option<PathBuf>,
    store: S,
}

impl Router<DiskStore> {
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self::with_store(directory, DiskStore)
    }
}

impl<S: FileStore> Router<S> {
    pub fn with_store(directory: Option<PathBuf>, store: S) -> Self {
        Self { directory, store }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Produces the response for a request. Handler errors, including
    /// file I/O failures other than a missing file, become 500.
    pub async fn route(&self, req: &Request) -> Response {
        match self.dispatch(req).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    method = %req.method,
                    target = %req.target,
                    error = %e,
                    "Handler failed"
                );
                Response::internal_error()
            }
        }
    }

    async fn dispatch(&self, req: &Request) -> anyhow::Result<Response> {
        let segments = req.segments();

        let response = match (&req.method, segments.as_slice()) {
            (Method::GET, []) => handlers::root(),
            (Method::GET, ["echo", value]) => handlers::echo(req, value)?,
            (Method::GET, ["user-agent"]) => handlers::user_agent(req),
            (Method::GET, ["files", name]) => {
                handlers::read_file(&self.store, self.directory(), name).await?
            }
            (Method::POST, ["files", name]) => {
                handlers::write_file(&self.store, self.directory(), name, &req.body).await?
            }
            (Method::GET | Method::POST, _) => Response::not_found(),
            (Method::PUT | Method::DELETE, _) => Response::method_not_allowed(),
            _ => Response::bad_request(),
        };

        Ok(response)
    }
}

use std::path::Path;

use anyhow::Context;

use crate::http::encoding::{self, GZIP};
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::routes::files::{FileError, FileStore};

const OCTET_STREAM: &str = "application/octet-stream";

pub(crate) fn root() -> Response {
    Response::ok(Vec::new())
}

pub(crate) fn echo(req: &Request, value: &str) -> anyhow::Result<Response> {
    let builder = ResponseBuilder::new(StatusCode::Ok);

    if req.accepts_encoding(GZIP) {
        let compressed = encoding::gzip(value.as_bytes()).context("gzip echo body")?;
        return Ok(builder
            .header("Content-Encoding", GZIP)
            .body(compressed)
            .build());
    }

    Ok(builder.body(value.as_bytes().to_vec()).build())
}

pub(crate) fn user_agent(req: &Request) -> Response {
    Response::ok(req.user_agent().unwrap_or_default())
}

pub(crate) async fn read_file<S: FileStore>(
    store: &S,
    directory: Option<&Path>,
    name: &str,
) -> anyhow::Result<Response> {
    let Some(directory) = directory else {
        return Ok(directory_missing());
    };

    match store.read(directory, name).await {
        Ok(contents) => Ok(ResponseBuilder::new(StatusCode::Ok)
            .content_type(OCTET_STREAM)
            .body(contents)
            .build()),
        Err(FileError::NotFound) => Ok(Response::not_found()),
        Err(e) => Err(e).with_context(|| format!("reading file {}", name)),
    }
}

pub(crate) async fn write_file<S: FileStore>(
    store: &S,
    directory: Option<&Path>,
    name: &str,
    contents: &[u8],
) -> anyhow::Result<Response> {
    let Some(directory) = directory else {
        return Ok(directory_missing());
    };

    store
        .write(directory, name, contents)
        .await
        .with_context(|| format!("writing file {}", name))?;

    Ok(Response::created())
}

fn directory_missing() -> Response {
    ResponseBuilder::new(StatusCode::InternalServerError)
        .body(b"no serving directory configured".to_vec())
        .build()
}

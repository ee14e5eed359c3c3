//! Content-Encoding negotiation. Only gzip is supported.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

pub const GZIP: &str = "gzip";

/// Splits an `Accept-Encoding` value into its coding tokens.
pub fn accepted_codings(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
}

pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

//! Streamed payload download into memory.

use std::io::{ErrorKind, Read};

use crate::error::{FetchError, FetchResult};
use crate::store::StoreTransport;

use super::ProgressCallback;

/// Size of each read from the response body (8KB).
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Upper bound for buffer preallocation from `content-length`.
const MAX_PREALLOC: u64 = 256 * 1024 * 1024;

/// Downloads a payload URL into an in-memory buffer.
///
/// There is no resumption: a failed read aborts the download.
#[derive(Debug)]
pub struct StreamDownloader<'a, T: StoreTransport> {
    transport: &'a T,
}

impl<'a, T: StoreTransport> StreamDownloader<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Stream `url` into memory, reporting progress after each chunk.
    pub fn download(
        &self,
        url: &str,
        progress: Option<&ProgressCallback>,
    ) -> FetchResult<Vec<u8>> {
        let stream = self.transport.open_stream(url)?;
        tracing::debug!(url, content_length = ?stream.content_length, "payload stream opened");

        let payload = read_payload(stream.reader, url, stream.content_length, progress)?;
        tracing::info!(bytes = payload.len(), "payload downloaded");
        Ok(payload)
    }
}

/// Read `reader` to the end in [`CHUNK_SIZE`] chunks.
///
/// `total` is the advertised length, passed through to `progress` unchanged;
/// `None` means the length is unknown.
pub fn read_payload<R: Read>(
    mut reader: R,
    url: &str,
    total: Option<u64>,
    progress: Option<&ProgressCallback>,
) -> FetchResult<Vec<u8>> {
    let capacity = total.unwrap_or(0).min(MAX_PREALLOC) as usize;
    let mut payload = Vec::with_capacity(capacity);
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut downloaded = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(FetchError::Http {
                    url: url.to_string(),
                    reason: format!("Read error: {}", e),
                })
            }
        };

        payload.extend_from_slice(&buffer[..bytes_read]);
        downloaded += bytes_read as u64;

        if let Some(cb) = progress {
            cb(downloaded, total);
        }
    }

    Ok(payload)
}

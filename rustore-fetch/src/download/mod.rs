//! Payload download.
//!
//! - `stream`: [`StreamDownloader`], chunked download into memory with progress
//! - `checksum`: SHA-256 digest of the saved package bytes
//!
//! # Example
//!
//! ```ignore
//! use rustore_fetch::download::{ProgressCallback, StreamDownloader};
//! use rustore_fetch::store::ReqwestTransport;
//!
//! let transport = ReqwestTransport::new(std::time::Duration::from_secs(300))?;
//! let progress: ProgressCallback = Box::new(|done, total| {
//!     println!("{} of {:?} bytes", done, total);
//! });
//! let payload = StreamDownloader::new(&transport).download(url, Some(&progress))?;
//! ```

pub mod checksum;
mod stream;

pub use checksum::sha256_hex;
pub use stream::{read_payload, StreamDownloader, CHUNK_SIZE};

/// Progress callback invoked after each chunk.
///
/// Arguments: (bytes_downloaded, total_bytes). `total_bytes` is `None` when
/// the server did not send a `content-length`.
pub type ProgressCallback = Box<dyn Fn(u64, Option<u64>) + Send + Sync>;

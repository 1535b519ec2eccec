//! RuStore backend access.
//!
//! - `types`: envelope decoding and per-endpoint body types
//! - `http`: the [`StoreTransport`] seam and its reqwest implementation
//! - `client`: [`StoreClient`], the overview and download-link calls

mod client;
mod http;
mod types;

pub use client::StoreClient;
pub use http::{PayloadStream, ReqwestTransport, StoreTransport, JSON_CONTENT_TYPE};
pub use types::{
    decode_response, AppId, ApplicationInfo, DownloadLinkInfo, DownloadLinkRequest,
    StoreResponse, CODE_OK,
};

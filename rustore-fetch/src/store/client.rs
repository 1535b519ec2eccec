//! RuStore backend client.

use crate::error::{FetchError, FetchResult};
use crate::package::PackageId;

use super::http::StoreTransport;
use super::types::{
    decode_response, AppId, ApplicationInfo, DownloadLinkInfo, DownloadLinkRequest, StoreResponse,
};

/// Client for the two metadata endpoints of the store backend.
///
/// Calls are made exactly once; there is no retry.
#[derive(Debug)]
pub struct StoreClient<T: StoreTransport> {
    transport: T,
    base_url: String,
}

impl<T: StoreTransport> StoreClient<T> {
    /// Create a client for `base_url` (no trailing slash).
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Underlying transport, shared with the payload downloader.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of the overview endpoint for `package`.
    pub fn overall_info_url(&self, package: &PackageId) -> String {
        format!("{}/applicationData/overallInfo/{}", self.base_url, package)
    }

    /// URL of the download-link endpoint.
    pub fn download_link_url(&self) -> String {
        format!("{}/applicationData/download-link", self.base_url)
    }

    /// Fetch overview information for `package`.
    pub fn application_info(
        &self,
        package: &PackageId,
    ) -> FetchResult<StoreResponse<ApplicationInfo>> {
        let url = self.overall_info_url(package);
        let body = self.transport.get(&url)?;
        let response = decode_response(&url, &body)?;

        if let StoreResponse::Err { ref code, .. } = response {
            tracing::info!(package = %package, code = %code, "overview lookup rejected");
        }
        Ok(response)
    }

    /// Request a signed download URL for `app_id`.
    pub fn download_link(&self, app_id: &AppId) -> FetchResult<StoreResponse<DownloadLinkInfo>> {
        let url = self.download_link_url();
        let request = DownloadLinkRequest {
            app_id,
            first_install: true,
        };
        let payload = serde_json::to_vec(&request).map_err(|e| FetchError::InvalidResponse {
            url: url.clone(),
            reason: format!("failed to encode request: {}", e),
        })?;

        let body = self.transport.post_json(&url, &payload)?;
        let response = decode_response(&url, &body)?;

        if let StoreResponse::Err { ref code, .. } = response {
            tracing::info!(app_id = %app_id, code = %code, "download link rejected");
        }
        Ok(response)
    }
}

//! The fetch pipeline.
//!
//! ```text
//! overallInfo ──► download-link ──► stream payload ──► unwrap + save ──► manifest ──► side-car
//!     │                 │
//!     └─ NotFound       └─ LinkUnavailable
//! ```
//!
//! Backend rejections end the run early with an outcome, not an error.
//! Transport and filesystem failures for the package itself are errors.
//! Everything after the package is saved is best-effort.

use std::path::PathBuf;

use crate::config::FetchConfig;
use crate::download::{ProgressCallback, StreamDownloader};
use crate::error::FetchResult;
use crate::package::{
    extract_metadata, save_package, write_metadata_json, AxmlManifestParser, ContainerKind,
    ManifestParser, MetadataOutcome, PackageId,
};
use crate::store::{ReqwestTransport, StoreClient, StoreResponse, StoreTransport};

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The overview lookup was rejected; nothing was downloaded.
    NotFound { reason: String },
    /// The download link was rejected; nothing was downloaded.
    LinkUnavailable { reason: String },
    /// The package was saved.
    Saved(FetchReport),
}

/// Details of a saved package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub package: PackageId,

    /// Display name from the store, if provided.
    pub app_name: Option<String>,

    /// Where the package file was written.
    pub output_path: PathBuf,

    /// How the payload was interpreted.
    pub container: ContainerKind,

    pub bytes_written: u64,

    /// Hex SHA-256 of the saved file.
    pub sha256: String,

    pub metadata: MetadataOutcome,

    /// Set when the side-car JSON was written.
    pub metadata_path: Option<PathBuf>,

    /// Non-fatal problems encountered after the package was saved.
    pub warnings: Vec<String>,
}

/// Runs the fetch pipeline for one package.
#[derive(Debug)]
pub struct PackageFetcher<T: StoreTransport, P: ManifestParser> {
    store: StoreClient<T>,
    parser: P,
    config: FetchConfig,
}

impl PackageFetcher<ReqwestTransport, AxmlManifestParser> {
    /// Create a fetcher using the real HTTP transport and manifest parser.
    pub fn from_config(config: FetchConfig) -> FetchResult<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::new(transport, AxmlManifestParser::new(), config))
    }
}

impl<T: StoreTransport, P: ManifestParser> PackageFetcher<T, P> {
    pub fn new(transport: T, parser: P, config: FetchConfig) -> Self {
        let store = StoreClient::new(transport, config.base_url.clone());
        Self {
            store,
            parser,
            config,
        }
    }

    /// Underlying store client.
    pub fn store(&self) -> &StoreClient<T> {
        &self.store
    }

    /// Manifest parser used for metadata extraction.
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Path the package file for `package` is written to.
    pub fn output_path(&self, package: &PackageId) -> PathBuf {
        self.config.output_dir.join(package.apk_file_name())
    }

    /// Run the pipeline for `package`.
    ///
    /// `progress` is invoked for every downloaded chunk.
    pub fn fetch(
        &self,
        package: &PackageId,
        progress: Option<&ProgressCallback>,
    ) -> FetchResult<FetchOutcome> {
        tracing::info!(package = %package, "resolving application");

        let info = match self.store.application_info(package)? {
            StoreResponse::Ok(info) => info,
            StoreResponse::Err { reason, .. } => {
                return Ok(FetchOutcome::NotFound { reason });
            }
        };

        tracing::info!(package = %package, app_id = %info.app_id, "requesting download link");

        let link = match self.store.download_link(&info.app_id)? {
            StoreResponse::Ok(link) => link,
            StoreResponse::Err { reason, .. } => {
                return Ok(FetchOutcome::LinkUnavailable { reason });
            }
        };

        let payload =
            StreamDownloader::new(self.store.transport()).download(&link.apk_url, progress)?;

        let output_path = self.output_path(package);
        let saved = save_package(&payload, &output_path)?;
        drop(payload);

        tracing::info!(
            path = %output_path.display(),
            bytes = saved.bytes_written,
            "package saved"
        );

        let mut warnings = Vec::new();

        let whats_new = info.whats_new.as_ref().map(|notes| notes.as_deref());
        let metadata = extract_metadata(&self.parser, &output_path, whats_new);

        let metadata_path = match metadata {
            MetadataOutcome::Ok(ref app) => {
                match write_metadata_json(&self.config.metadata_path, app) {
                    Ok(()) => Some(self.config.metadata_path.clone()),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to write metadata file");
                        warnings.push(e.to_string());
                        None
                    }
                }
            }
            MetadataOutcome::Unavailable { ref reason } => {
                warnings.push(reason.clone());
                None
            }
        };

        Ok(FetchOutcome::Saved(FetchReport {
            package: package.clone(),
            app_name: info.app_name,
            output_path,
            container: saved.kind,
            bytes_written: saved.bytes_written,
            sha256: saved.sha256,
            metadata,
            metadata_path,
            warnings,
        }))
    }
}

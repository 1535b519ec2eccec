//! Container unwrapping for downloaded payloads.
//!
//! Some store payloads are zip wrappers holding the real `.apk`. Others are
//! the `.apk` itself. Since an APK is also a zip archive, the decision is made
//! on the entries: a zip holding an entry ending in `.apk` is a wrapper,
//! anything else is saved as-is.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::download::sha256_hex;
use crate::error::{FetchError, FetchResult};

use super::naming::is_package_entry;

/// Result of inspecting a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerOutcome {
    /// Payload is a wrapper; `bytes` is the decompressed package entry.
    Zip { entry: String, bytes: Vec<u8> },
    /// Payload is a zip without a package entry, i.e. a bare APK.
    Raw,
    /// Payload is not a readable zip, or the package entry failed to decompress.
    Invalid { reason: String },
}

/// [`ContainerOutcome`] without the entry bytes, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerKind {
    Zip { entry: String },
    Raw,
    Invalid { reason: String },
}

impl ContainerOutcome {
    pub fn kind(&self) -> ContainerKind {
        match self {
            ContainerOutcome::Zip { entry, .. } => ContainerKind::Zip {
                entry: entry.clone(),
            },
            ContainerOutcome::Raw => ContainerKind::Raw,
            ContainerOutcome::Invalid { reason } => ContainerKind::Invalid {
                reason: reason.clone(),
            },
        }
    }
}

impl ContainerKind {
    /// Whether the package was extracted from a wrapper archive.
    pub fn is_extracted(&self) -> bool {
        matches!(self, ContainerKind::Zip { .. })
    }
}

/// A package file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPackage {
    pub kind: ContainerKind,
    pub bytes_written: u64,
    /// Hex SHA-256 of the bytes written.
    pub sha256: String,
}

/// Inspect `payload` and extract the first package entry, in archive order.
pub fn inspect(payload: &[u8]) -> ContainerOutcome {
    let mut archive = match ZipArchive::new(Cursor::new(payload)) {
        Ok(archive) => archive,
        Err(e) => {
            return ContainerOutcome::Invalid {
                reason: e.to_string(),
            }
        }
    };

    let mut entry_index = None;
    for i in 0..archive.len() {
        match archive.by_index_raw(i) {
            Ok(file) if !file.is_dir() && is_package_entry(file.name()) => {
                entry_index = Some(i);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                return ContainerOutcome::Invalid {
                    reason: format!("unreadable entry {}: {}", i, e),
                }
            }
        }
    }

    let Some(index) = entry_index else {
        return ContainerOutcome::Raw;
    };

    let mut file = match archive.by_index(index) {
        Ok(file) => file,
        Err(e) => {
            return ContainerOutcome::Invalid {
                reason: e.to_string(),
            }
        }
    };

    // The declared size comes from an unchecked header; let the buffer grow
    // with the data actually decompressed.
    let entry = file.name().to_string();
    let mut bytes = Vec::new();
    if let Err(e) = file.read_to_end(&mut bytes) {
        return ContainerOutcome::Invalid {
            reason: format!("failed to decompress {}: {}", entry, e),
        };
    }

    ContainerOutcome::Zip { entry, bytes }
}

/// Unwrap `payload` if needed and write the package file to `dest`.
///
/// The parent directory is created if missing; an existing file is replaced.
pub fn save_package(payload: &[u8], dest: &Path) -> FetchResult<SavedPackage> {
    let outcome = inspect(payload);

    let bytes: &[u8] = match outcome {
        ContainerOutcome::Zip {
            ref entry,
            ref bytes,
        } => {
            tracing::info!(entry = %entry, "package extracted from wrapper archive");
            bytes.as_slice()
        }
        ContainerOutcome::Raw => {
            tracing::debug!("payload has no package entry, saving as-is");
            payload
        }
        ContainerOutcome::Invalid { ref reason } => {
            tracing::debug!(reason = %reason, "payload is not a zip, saving as-is");
            payload
        }
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FetchError::CreateDirFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(dest, bytes).map_err(|e| FetchError::WriteFailed {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(SavedPackage {
        kind: outcome.kind(),
        bytes_written: bytes.len() as u64,
        sha256: sha256_hex(bytes),
    })
}

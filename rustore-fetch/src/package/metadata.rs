//! Application metadata: best-effort extraction and the JSON side-car.

use std::fmt::Display;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, FetchResult};

use super::manifest::{ManifestInfo, ManifestParser};

/// Release notes used when the store has none.
pub const DEFAULT_WHATS_NEW: &str = "Информация отсутствует";

/// Width of the summary separator line.
const SUMMARY_RULE_WIDTH: usize = 40;

/// Metadata written to the side-car file.
///
/// Field names are the JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub package: String,
    pub version_name: Option<String>,
    pub version_code: Option<u64>,
    pub min_sdk_version: Option<u32>,
    pub target_sdk_version: Option<u32>,
    /// `null` only when the store sent an explicit `null`.
    pub whats_new: Option<String>,
}

impl AppMetadata {
    /// Combine manifest fields with store release notes.
    ///
    /// `whats_new` is `None` when the store omitted the key, which selects
    /// [`DEFAULT_WHATS_NEW`], and `Some(None)` when it sent `null`.
    pub fn new(manifest: ManifestInfo, whats_new: Option<Option<&str>>) -> Self {
        Self {
            package: manifest.package,
            version_name: manifest.version_name,
            version_code: manifest.version_code,
            min_sdk_version: manifest.min_sdk_version,
            target_sdk_version: manifest.target_sdk_version,
            whats_new: whats_new
                .unwrap_or(Some(DEFAULT_WHATS_NEW))
                .map(str::to_string),
        }
    }
}

/// Result of metadata extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataOutcome {
    Ok(AppMetadata),
    /// The package was saved but its manifest could not be read.
    Unavailable { reason: String },
}

impl MetadataOutcome {
    pub fn metadata(&self) -> Option<&AppMetadata> {
        match self {
            MetadataOutcome::Ok(metadata) => Some(metadata),
            MetadataOutcome::Unavailable { .. } => None,
        }
    }
}

/// Read metadata from the saved package at `apk_path`.
///
/// Parser failures never propagate; they are logged and returned as
/// [`MetadataOutcome::Unavailable`].
pub fn extract_metadata<P: ManifestParser + ?Sized>(
    parser: &P,
    apk_path: &Path,
    whats_new: Option<Option<&str>>,
) -> MetadataOutcome {
    match parser.parse(apk_path) {
        Ok(manifest) => {
            tracing::debug!(package = %manifest.package, "manifest parsed");
            MetadataOutcome::Ok(AppMetadata::new(manifest, whats_new))
        }
        Err(e) => {
            tracing::warn!(path = %apk_path.display(), error = %e, "package metadata unavailable");
            MetadataOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

/// Write `metadata` as pretty-printed UTF-8 JSON, replacing any existing file.
///
/// Non-ASCII text (release notes are usually Russian) is written as-is.
pub fn write_metadata_json(path: &Path, metadata: &AppMetadata) -> FetchResult<()> {
    let json = serde_json::to_string_pretty(metadata).map_err(|e| FetchError::WriteFailed {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| FetchError::CreateDirFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, json).map_err(|e| FetchError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Human-readable summary block.
pub fn format_summary(metadata: &AppMetadata) -> String {
    let rule = "=".repeat(SUMMARY_RULE_WIDTH);
    format!(
        "{rule}\nPackage: {}\nVersion: {} ({})\nMin SDK: {}\nTarget SDK: {}\n{rule}",
        metadata.package,
        or_unknown(metadata.version_name.as_ref()),
        or_unknown(metadata.version_code.as_ref()),
        or_unknown(metadata.min_sdk_version.as_ref()),
        or_unknown(metadata.target_sdk_version.as_ref()),
    )
}

fn or_unknown<T: Display>(value: Option<&T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::manifest::ManifestError;
    use tempfile::TempDir;

    struct FixedParser(Option<ManifestInfo>);

    impl ManifestParser for FixedParser {
        fn parse(&self, _apk_path: &Path) -> Result<ManifestInfo, ManifestError> {
            self.0.clone().ok_or(ManifestError::MissingManifest)
        }
    }

    fn sample() -> AppMetadata {
        AppMetadata {
            package: "ru.oneme.app".to_string(),
            version_name: Some("25.1.0".to_string()),
            version_code: Some(6512),
            min_sdk_version: Some(24),
            target_sdk_version: Some(34),
            whats_new: Some("Исправления ошибок".to_string()),
        }
    }

    #[test]
    fn test_new_defaults_whats_new() {
        let manifest = ManifestInfo {
            package: "a.b".to_string(),
            ..Default::default()
        };
        let metadata = AppMetadata::new(manifest, None);
        assert_eq!(metadata.whats_new.as_deref(), Some(DEFAULT_WHATS_NEW));
    }

    #[test]
    fn test_new_keeps_null_whats_new() {
        let manifest = ManifestInfo {
            package: "a.b".to_string(),
            ..Default::default()
        };
        let metadata = AppMetadata::new(manifest, Some(None));
        assert_eq!(metadata.whats_new, None);
    }

    #[test]
    fn test_extract_ok() {
        let parser = FixedParser(Some(ManifestInfo {
            package: "a.b".to_string(),
            version_code: Some(3),
            ..Default::default()
        }));

        let outcome = extract_metadata(&parser, Path::new("x.apk"), Some(Some("notes")));

        let metadata = outcome.metadata().unwrap();
        assert_eq!(metadata.package, "a.b");
        assert_eq!(metadata.version_code, Some(3));
        assert_eq!(metadata.whats_new.as_deref(), Some("notes"));
    }

    #[test]
    fn test_extract_failure_is_unavailable() {
        let outcome = extract_metadata(&FixedParser(None), Path::new("x.apk"), None);

        assert_eq!(
            outcome,
            MetadataOutcome::Unavailable {
                reason: "package has no AndroidManifest.xml".to_string()
            }
        );
        assert!(outcome.metadata().is_none());
    }

    #[test]
    fn test_json_has_exact_keys_and_unescaped_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app_info.json");

        write_metadata_json(&path, &sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Исправления ошибок"));
        assert!(text.contains("\n  \"package\": \"ru.oneme.app\""));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "min_sdk_version",
                "package",
                "target_sdk_version",
                "version_code",
                "version_name",
                "whats_new"
            ]
        );
    }

    #[test]
    fn test_json_overwrites_previous_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app_info.json");
        fs::write(&path, "x".repeat(10_000)).unwrap();

        write_metadata_json(&path, &sample()).unwrap();

        let parsed: AppMetadata =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_json_missing_fields_are_null() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("meta.json");
        let metadata = AppMetadata {
            version_name: None,
            target_sdk_version: None,
            whats_new: None,
            ..sample()
        };

        write_metadata_json(&path, &metadata).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["whats_new"].is_null());
        assert!(value["version_name"].is_null());
        assert!(value["target_sdk_version"].is_null());
        assert_eq!(value["min_sdk_version"], 24);
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&sample());
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "=".repeat(40));
        assert_eq!(lines[1], "Package: ru.oneme.app");
        assert_eq!(lines[2], "Version: 25.1.0 (6512)");
        assert_eq!(lines[3], "Min SDK: 24");
        assert_eq!(lines[4], "Target SDK: 34");
        assert_eq!(lines[5], lines[0]);
    }

    #[test]
    fn test_format_summary_unknown_fields() {
        let metadata = AppMetadata {
            version_name: None,
            version_code: None,
            ..sample()
        };
        assert!(format_summary(&metadata).contains("Version: unknown (unknown)"));
    }
}

//! Android manifest reading.
//!
//! Binary XML decoding is delegated to the `axmldecoder` crate; this module
//! only locates `AndroidManifest.xml` inside the APK and picks the handful of
//! attributes the report needs.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::panic;
use std::path::Path;

use axmldecoder::Node;
use thiserror::Error;
use zip::ZipArchive;

/// Name of the manifest entry inside an APK.
pub const MANIFEST_ENTRY: &str = "AndroidManifest.xml";

/// Errors reading a package manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to open package: {0}")]
    Io(#[from] std::io::Error),

    #[error("package is not a valid APK archive: {0}")]
    NotAnArchive(String),

    #[error("package has no AndroidManifest.xml")]
    MissingManifest,

    #[error("failed to decode AndroidManifest.xml: {0}")]
    Decode(String),

    #[error("manifest has no package attribute")]
    MissingPackage,
}

/// Manifest fields used for the metadata report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    pub package: String,
    pub version_name: Option<String>,
    pub version_code: Option<u64>,
    pub min_sdk_version: Option<u32>,
    pub target_sdk_version: Option<u32>,
}

impl ManifestInfo {
    /// Build from the attributes of `<manifest>` and `<uses-sdk>`.
    ///
    /// Attribute keys may carry a namespace prefix (`android:versionCode`);
    /// only the local name is matched.
    pub fn from_attributes(
        manifest: &HashMap<String, String>,
        uses_sdk: Option<&HashMap<String, String>>,
    ) -> Result<Self, ManifestError> {
        let manifest = by_local_name(manifest);
        let uses_sdk = uses_sdk.map(by_local_name).unwrap_or_default();

        let package = manifest
            .get("package")
            .filter(|p| !p.is_empty())
            .ok_or(ManifestError::MissingPackage)?
            .to_string();

        Ok(Self {
            package,
            version_name: manifest.get("versionName").map(|v| v.to_string()),
            version_code: manifest.get("versionCode").and_then(|v| parse_int(v)),
            min_sdk_version: uses_sdk
                .get("minSdkVersion")
                .and_then(|v| parse_int(v))
                .and_then(|v| u32::try_from(v).ok()),
            target_sdk_version: uses_sdk
                .get("targetSdkVersion")
                .and_then(|v| parse_int(v))
                .and_then(|v| u32::try_from(v).ok()),
        })
    }
}

/// Reads manifest metadata from a saved package file.
pub trait ManifestParser {
    fn parse(&self, apk_path: &Path) -> Result<ManifestInfo, ManifestError>;
}

/// [`ManifestParser`] backed by `axmldecoder`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AxmlManifestParser;

impl AxmlManifestParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode a binary `AndroidManifest.xml`.
    pub fn decode(&self, manifest: &[u8]) -> Result<ManifestInfo, ManifestError> {
        // The decoder runs on untrusted input and is not panic-free.
        let document = panic::catch_unwind(|| axmldecoder::parse(manifest))
            .map_err(|_| ManifestError::Decode("decoder panicked".to_string()))?
            .map_err(|e| ManifestError::Decode(format!("{:?}", e)))?;

        let Some(Node::Element(root)) = document.get_root() else {
            return Err(ManifestError::Decode("no root element".to_string()));
        };

        let manifest_attrs: HashMap<String, String> = root
            .get_attributes()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let uses_sdk_attrs: Option<HashMap<String, String>> =
            root.get_children().iter().find_map(|child| match child {
                Node::Element(element) if element.get_tag() == "uses-sdk" => Some(
                    element
                        .get_attributes()
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                ),
                _ => None,
            });

        ManifestInfo::from_attributes(&manifest_attrs, uses_sdk_attrs.as_ref())
    }
}

impl ManifestParser for AxmlManifestParser {
    fn parse(&self, apk_path: &Path) -> Result<ManifestInfo, ManifestError> {
        let file = File::open(apk_path)?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| ManifestError::NotAnArchive(e.to_string()))?;

        let mut entry = archive
            .by_name(MANIFEST_ENTRY)
            .map_err(|_| ManifestError::MissingManifest)?;

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;

        self.decode(&bytes)
    }
}

/// Strip any namespace prefix from attribute keys.
fn by_local_name(attrs: &HashMap<String, String>) -> HashMap<&str, &str> {
    attrs
        .iter()
        .map(|(k, v)| {
            let local = k.rsplit_once(':').map(|(_, name)| name).unwrap_or(k.as_str());
            (local, v.as_str())
        })
        .collect()
}

/// Parse an integer attribute as rendered by the decoder.
///
/// Hex-typed values are rendered as `0x` followed by the decimal value, so
/// the digits are decimal in both forms.
fn parse_int(value: &str) -> Option<u64> {
    let value = value.trim();
    value.strip_prefix("0x").unwrap_or(value).parse().ok()
}

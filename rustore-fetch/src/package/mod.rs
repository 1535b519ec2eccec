//! Package file handling.
//!
//! This module provides:
//! - [`PackageId`]: validated store package identifiers (`naming`)
//! - Container unwrapping and saving of downloaded payloads (`container`)
//! - Manifest reading through [`ManifestParser`] (`manifest`)
//! - [`AppMetadata`], the JSON side-car and console summary (`metadata`)

pub mod container;
pub mod manifest;
pub mod metadata;
mod naming;

pub use container::{inspect, save_package, ContainerKind, ContainerOutcome, SavedPackage};
pub use manifest::{AxmlManifestParser, ManifestError, ManifestInfo, ManifestParser};
pub use metadata::{
    extract_metadata, format_summary, write_metadata_json, AppMetadata, MetadataOutcome,
    DEFAULT_WHATS_NEW,
};
pub use naming::{is_package_entry, PackageId, APK_EXTENSION};

//! Package identifier validation and file naming.

use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

/// File extension of Android application packages.
pub const APK_EXTENSION: &str = ".apk";

/// Store package identifier, e.g. `ru.oneme.app`.
///
/// The identifier becomes both a URL path segment and a file name, so it
/// must be non-empty and free of whitespace and path separators.
///
/// # Example
///
/// ```
/// use rustore_fetch::package::PackageId;
///
/// let id = PackageId::parse("ru.oneme.app").unwrap();
/// assert_eq!(id.apk_file_name(), "ru.oneme.app.apk");
/// assert!(PackageId::parse("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId(String);

impl PackageId {
    /// Validate and wrap a package identifier.
    pub fn parse(value: &str) -> Result<Self, FetchError> {
        let invalid = value.is_empty()
            || value == "."
            || value == ".."
            || value
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#'));

        if invalid {
            return Err(FetchError::InvalidPackageId(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the saved package file.
    pub fn apk_file_name(&self) -> String {
        format!("{}{}", self.0, APK_EXTENSION)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Check whether an archive entry name looks like a package file.
pub fn is_package_entry(name: &str) -> bool {
    name.ends_with(APK_EXTENSION)
}

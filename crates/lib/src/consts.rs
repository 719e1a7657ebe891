//! Shared constants.

/// File name of a project's package manifest.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Directory under the project root that holds the package manifest.
pub const PACKAGES_DIR: &str = "Packages";

/// Suffix of the uniquely named temp file an atomic save writes before renaming it into place.
pub const TEMP_SUFFIX: &str = ".tmp";

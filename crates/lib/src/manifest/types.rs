//! Manifest value types.
//!
//! # Manifest Format
//!
//! ```json
//! {
//!   "dependencies": {
//!     "com.example.pkg": "1.2.3",
//!     "com.example.other": "https://example.com/repo.git#v2"
//!   },
//!   "scopedRegistries": []
//! }
//! ```
//!
//! Only `dependencies` is interpreted. Every other top-level field is carried
//! through untouched so a load/save cycle never drops it.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const DEPENDENCIES_FIELD: &str = "dependencies";

/// A package manifest.
///
/// Dependency references are opaque: a semver string, a git URL and a local
/// `file:` path are all stored the same way.
///
/// # Ordering
///
/// Uses [`BTreeMap`] so the encoded file is deterministic. Nothing depends on
/// the order of entries.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  /// Dependency references keyed by dependency name.
  ///
  /// A missing field and an explicit `null` both decode to an empty map.
  #[serde(default, deserialize_with = "deserialize_dependencies")]
  pub dependencies: BTreeMap<String, String>,

  /// Top-level fields other than `dependencies`, kept verbatim.
  ///
  /// Must not contain a `dependencies` key; encoding rejects one.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

fn deserialize_dependencies<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Manifest {
  /// Create a manifest with no dependencies.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a dependency, builder style.
  pub fn with_dependency(mut self, name: impl Into<String>, reference: impl Into<String>) -> Self {
    self.insert(name, reference);
    self
  }

  /// Get the reference recorded for a dependency.
  pub fn get(&self, name: &str) -> Option<&str> {
    self.dependencies.get(name).map(String::as_str)
  }

  /// Insert or replace a dependency, returning the previous reference.
  pub fn insert(&mut self, name: impl Into<String>, reference: impl Into<String>) -> Option<String> {
    self.dependencies.insert(name.into(), reference.into())
  }

  /// Remove a dependency, returning its reference.
  pub fn remove(&mut self, name: &str) -> Option<String> {
    self.dependencies.remove(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.dependencies.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.dependencies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dependencies.is_empty()
  }

  /// Iterate over `(name, reference)` pairs in name order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.dependencies.iter().map(|(name, reference)| (name.as_str(), reference.as_str()))
  }

  /// Decode a manifest from JSON text.
  pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(content)
  }

  /// Encode the manifest as JSON text.
  ///
  /// `dependencies` is always written, even when empty. Fails if `extra`
  /// carries its own `dependencies` key, since the output would not decode.
  pub fn to_json(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
    if self.extra.contains_key(DEPENDENCIES_FIELD) {
      return Err(serde::ser::Error::custom("extra fields must not contain a `dependencies` key"));
    }
    match format {
      OutputFormat::Pretty => serde_json::to_string_pretty(self),
      OutputFormat::Compact => serde_json::to_string(self),
    }
  }
}

/// How a manifest is laid out when written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  /// Two-space indented JSON.
  #[default]
  Pretty,
  /// Single-line JSON.
  Compact,
}

/// Options for saving a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
  /// Layout of the written JSON.
  pub format: OutputFormat,
  /// Write to a sibling temp file and rename it over the destination.
  ///
  /// When false the destination is truncated and written in place.
  pub atomic: bool,
}

impl Default for SaveOptions {
  fn default() -> Self {
    Self {
      format: OutputFormat::Pretty,
      atomic: true,
    }
  }
}

/// Broad category of a [`ManifestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestErrorKind {
  /// The manifest file could not be opened or read.
  Read,
  /// The file was read but is not a valid manifest.
  Decode,
  /// The manifest could not be encoded or written.
  Write,
}

/// Errors that can occur when loading or saving a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// Failed to read the manifest file.
  #[error("failed to read manifest {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to parse the manifest JSON.
  #[error("failed to parse manifest {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Failed to serialize the manifest.
  #[error("failed to serialize manifest: {0}")]
  Serialize(#[source] serde_json::Error),

  /// Failed to write the manifest file.
  #[error("failed to write manifest {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl ManifestError {
  pub fn kind(&self) -> ManifestErrorKind {
    match self {
      ManifestError::Read { .. } => ManifestErrorKind::Read,
      ManifestError::Parse { .. } => ManifestErrorKind::Decode,
      ManifestError::Serialize(_) | ManifestError::Write { .. } => ManifestErrorKind::Write,
    }
  }

  /// True when a read failed because the file does not exist.
  pub fn is_not_found(&self) -> bool {
    matches!(self, ManifestError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
  }
}

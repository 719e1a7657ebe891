//! Reading and writing manifest files.
//!
//! Every function here is an independent operation against the filesystem:
//! nothing is cached between calls and no lock is taken. Callers that load
//! and save the same path concurrently must serialize those calls themselves.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::{debug, warn};

use crate::consts::{MANIFEST_FILENAME, PACKAGES_DIR, TEMP_SUFFIX};

use super::types::{Manifest, ManifestError, SaveOptions};

/// Outcome of reading a manifest that may not exist.
#[derive(Debug)]
pub enum Probe {
  /// The file exists and decoded successfully.
  Found(Manifest),
  /// No regular file exists at the path.
  Absent,
  /// The file exists but could not be read or decoded.
  Unusable(ManifestError),
}

impl Probe {
  /// The manifest, if one was found. `Absent` and `Unusable` both yield `None`.
  pub fn into_manifest(self) -> Option<Manifest> {
    match self {
      Probe::Found(manifest) => Some(manifest),
      Probe::Absent | Probe::Unusable(_) => None,
    }
  }

  /// True for [`Probe::Found`].
  pub fn is_found(&self) -> bool {
    matches!(self, Probe::Found(_))
  }
}

/// Path of the manifest inside a project: `<root>/Packages/manifest.json`.
pub fn project_manifest_path(project_root: &Path) -> PathBuf {
  project_root.join(PACKAGES_DIR).join(MANIFEST_FILENAME)
}

/// Load a manifest from the given path.
///
/// Returns [`ManifestError::Read`] if the file cannot be read (including when
/// it does not exist) and [`ManifestError::Parse`] if its contents are not a
/// valid manifest. The file is never modified.
pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
  debug!(path = %path.display(), "loading manifest");

  let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let manifest = Manifest::from_json(&content).map_err(|source| ManifestError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  debug!(
    path = %path.display(),
    dependency_count = manifest.len(),
    extra_fields = manifest.extra.len(),
    "manifest loaded"
  );
  Ok(manifest)
}

/// Read a manifest, reporting absence and failure as distinct outcomes.
///
/// Anything other than an existing regular file (a missing path, a directory)
/// is [`Probe::Absent`].
pub fn probe(path: &Path) -> Probe {
  if !path.is_file() {
    debug!(path = %path.display(), "no manifest file");
    return Probe::Absent;
  }

  match load(path) {
    Ok(manifest) => Probe::Found(manifest),
    Err(err) => Probe::Unusable(err),
  }
}

/// Load a manifest if a usable one exists.
///
/// Returns `None` both when the file is absent and when it exists but cannot
/// be read or decoded. The second case is logged as a warning and otherwise
/// discarded; use [`probe`] to tell the two apart.
pub fn try_load(path: &Path) -> Option<Manifest> {
  match probe(path) {
    Probe::Unusable(err) => {
      warn!(
        path = %path.display(),
        kind = ?err.kind(),
        error = %err,
        details = ?err,
        "ignoring unusable manifest"
      );
      None
    }
    outcome => outcome.into_manifest(),
  }
}

/// Save a manifest with the default [`SaveOptions`].
pub fn save(path: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
  save_with(path, manifest, &SaveOptions::default())
}

/// Save a manifest, replacing any existing content at `path`.
///
/// The parent directory must already exist. With `options.atomic` the content
/// is written to a uniquely named temp file next to the destination and
/// renamed over it, so readers see either the old or the new file. A symlinked
/// destination is resolved first so the link's target receives the content,
/// and an existing file's permissions are carried over. The temp file is
/// removed if any step fails.
pub fn save_with(path: &Path, manifest: &Manifest, options: &SaveOptions) -> Result<(), ManifestError> {
  debug!(
    path = %path.display(),
    dependency_count = manifest.len(),
    format = ?options.format,
    atomic = options.atomic,
    "saving manifest"
  );

  let content = manifest.to_json(options.format).map_err(ManifestError::Serialize)?;

  let write_err = |source: io::Error| ManifestError::Write {
    path: path.to_path_buf(),
    source,
  };

  if options.atomic {
    write_atomic(path, &content).map_err(write_err)?;
  } else {
    fs::write(path, &content).map_err(write_err)?;
  }

  debug!(path = %path.display(), bytes = content.len(), "manifest saved");
  Ok(())
}

fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
  let target = resolve_destination(path)?;
  let Some(file_name) = target.file_name() else {
    return Err(io::Error::new(io::ErrorKind::InvalidInput, "manifest path has no file name"));
  };
  let dir = match target.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let existing = fs::metadata(&target).ok().filter(|meta| meta.is_file());

  let mut prefix = std::ffi::OsString::from(".");
  prefix.push(file_name);
  prefix.push(".");

  let mut builder = Builder::new();
  builder.prefix(&prefix).suffix(TEMP_SUFFIX);
  // New files get the usual umask-filtered mode rather than the temp file's 0600.
  #[cfg(unix)]
  if existing.is_none() {
    use std::os::unix::fs::PermissionsExt;
    builder.permissions(fs::Permissions::from_mode(0o666));
  }

  let mut temp = builder.tempfile_in(dir)?;
  temp.write_all(content.as_bytes())?;
  if let Some(meta) = existing {
    temp.as_file().set_permissions(meta.permissions())?;
  }
  temp.persist(&target).map_err(|e| e.error)?;
  Ok(())
}

/// Follow a symlinked destination to the file it points at.
fn resolve_destination(path: &Path) -> io::Result<PathBuf> {
  match fs::canonicalize(path) {
    Ok(resolved) => Ok(resolved),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
    Err(e) => Err(e),
  }
}

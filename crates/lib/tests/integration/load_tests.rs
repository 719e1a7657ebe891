//! Loading and probing manifests written by other tools.

use pkgmanifest_lib::manifest::{self, ManifestErrorKind, Probe};

use super::common::TestProject;

mod load {
  use super::*;

  #[test]
  fn reads_hand_written_manifest() {
    let project = TestProject::new();
    project.write_manifest(
      r#"{
  "dependencies": {
    "com.example.pkg": "1.2.3",
    "com.example.other": "https://example.com/repo.git#v2"
  }
}
"#,
    );

    let loaded = manifest::load(&project.manifest_path).unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get("com.example.pkg"), Some("1.2.3"));
    assert_eq!(loaded.get("com.example.other"), Some("https://example.com/repo.git#v2"));
  }

  #[test]
  fn missing_file_fails_with_read_kind() {
    let project = TestProject::new();

    let err = manifest::load(&project.manifest_path).unwrap_err();

    assert_eq!(err.kind(), ManifestErrorKind::Read);
    assert!(err.to_string().contains("manifest.json"));
  }

  #[test]
  fn corrupt_file_fails_with_decode_kind() {
    let project = TestProject::new();
    project.write_manifest(r#"{"dependencies": {"com.example.pkg": "1.2.3""#);

    let err = manifest::load(&project.manifest_path).unwrap_err();

    assert_eq!(err.kind(), ManifestErrorKind::Decode);
    assert!(std::error::Error::source(&err).is_some());
  }

  #[test]
  fn each_load_is_independent() {
    let project = TestProject::new();
    project.write_manifest(r#"{"dependencies": {"a": "1"}}"#);

    let mut first = manifest::load(&project.manifest_path).unwrap();
    first.insert("b", "2");
    let second = manifest::load(&project.manifest_path).unwrap();

    assert_eq!(second.len(), 1);
    assert!(!second.contains("b"));
  }
}

mod try_load {
  use super::*;

  #[test]
  fn missing_project_manifest_is_none() {
    let project = TestProject::new();

    assert!(manifest::try_load(&project.manifest_path).is_none());
  }

  #[test]
  fn corrupt_manifest_is_none_but_load_fails() {
    let project = TestProject::new();
    project.write_manifest("not valid json");

    assert!(manifest::try_load(&project.manifest_path).is_none());
    assert!(manifest::load(&project.manifest_path).is_err());
  }

  #[test]
  fn probe_distinguishes_absent_from_corrupt() {
    let project = TestProject::new();
    assert!(matches!(manifest::probe(&project.manifest_path), Probe::Absent));

    project.write_manifest("[1, 2, 3]");
    assert!(matches!(manifest::probe(&project.manifest_path), Probe::Unusable(_)));
  }

  #[test]
  fn packages_directory_is_not_a_manifest() {
    let project = TestProject::new();
    let packages_dir = project.root().join("Packages");

    assert!(manifest::try_load(&packages_dir).is_none());
  }
}

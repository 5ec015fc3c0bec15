use std::fs;

use bundle_stamp::patch::{
    patch_file, patch_file_checked, replace_in_file, write_atomic, ReplacementMap,
};
use bundle_stamp::StampError;
use tempfile::TempDir;

const TEMPLATE: &str = "metadata:\n  containerImage: INSERT-CONTAINER-IMAGE\n  image: INSERT-CONTAINER-IMAGE\n";

#[test]
fn test_replace_in_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("csv.yaml");
    fs::write(&path, TEMPLATE).unwrap();

    let outcome = replace_in_file(&path, "INSERT-CONTAINER-IMAGE", "quay.io/org/op:v1").unwrap();

    assert_eq!(outcome.total(), 2);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "metadata:\n  containerImage: quay.io/org/op:v1\n  image: quay.io/org/op:v1\n"
    );
}

#[test]
fn test_round_trip_restores_content() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("csv.yaml");
    fs::write(&path, TEMPLATE).unwrap();

    replace_in_file(&path, "INSERT-CONTAINER-IMAGE", "IMAGE@sha256:0f0f").unwrap();
    replace_in_file(&path, "IMAGE@sha256:0f0f", "INSERT-CONTAINER-IMAGE").unwrap();

    assert_eq!(fs::read(&path).unwrap(), TEMPLATE.as_bytes());
}

#[cfg(unix)]
#[test]
fn test_permissions_survive_round_trip() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("Dockerfile");
    fs::write(&path, "COPY bundle/manifests /manifests/\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o750)).unwrap();

    replace_in_file(&path, "bundle/manifests", "manifests").unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o750);

    replace_in_file(&path, "manifests /", "bundle/manifests /").unwrap();
    assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o750);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "COPY bundle/manifests /manifests/\n"
    );
}

#[cfg(unix)]
#[test]
fn test_unwritable_directory_is_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("locked");
    fs::create_dir(&dir).unwrap();
    let path = dir.join("csv.yaml");
    fs::write(&path, TEMPLATE).unwrap();
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

    // Permission bits do not bind root; nothing to check there.
    if fs::write(dir.join("root-check"), "").is_ok() {
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = write_atomic(&path, "replaced\n");
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(result, Err(StampError::PermissionDenied(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);
}

#[test]
fn test_missing_file_is_file_not_found() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("absent.yaml");

    let err = replace_in_file(&path, "a", "b").unwrap_err();
    assert!(matches!(err, StampError::FileNotFound(ref p) if p == &path));
}

#[test]
fn test_map_applied_as_single_swap_leaves_no_temp_files() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("csv.yaml");
    fs::write(&path, TEMPLATE).unwrap();

    let map = ReplacementMap::new()
        .replace("INSERT-CONTAINER-IMAGE", "img")
        .append("metadata:", "\n  namespace: koku");
    patch_file(&path, &map).unwrap();

    let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "metadata:\n  namespace: koku\n  containerImage: img\n  image: img\n"
    );
}

#[test]
fn test_failed_check_keeps_original() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("csv.yaml");
    fs::write(&path, TEMPLATE).unwrap();

    let map = ReplacementMap::new().replace("INSERT-CONTAINER-IMAGE", "img");
    let err = patch_file_checked(&path, &map, |_| Err(StampError::invalid_manifest("rejected")))
        .unwrap_err();

    assert!(matches!(err, StampError::InvalidManifest(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);
}

#[test]
fn test_unchanged_file_is_not_rewritten() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("csv.yaml");
    fs::write(&path, TEMPLATE).unwrap();
    let before = fs::metadata(&path).unwrap().modified().unwrap();

    let outcome = replace_in_file(&path, "NOT-IN-FILE", "x").unwrap();

    assert!(!outcome.changed);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
}

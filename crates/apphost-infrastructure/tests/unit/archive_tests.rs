//! Archive client tests

use std::fs;

use apphost_domain::ports::ArchiveClient;
use apphost_infrastructure::services::TarGzArchiver;
use tempfile::TempDir;

fn packed_fixture(dir: &TempDir) -> std::path::PathBuf {
    let content = dir.path().join("content");
    fs::create_dir_all(content.join("lib")).unwrap();
    fs::write(content.join("plugin.toml"), "name = \"weather\"").unwrap();
    fs::write(content.join("lib").join("weather.bin"), [1u8, 2, 3]).unwrap();

    let archive = dir.path().join("weather.tar.gz");
    TarGzArchiver::new()
        .pack_directory(&content, &archive)
        .expect("packing should succeed");
    archive
}

#[test]
fn test_extract_all_restores_directory_tree() {
    let dir = TempDir::new().unwrap();
    let archive = packed_fixture(&dir);
    let target = dir.path().join("installed");

    TarGzArchiver::new()
        .extract_all(&archive, &target, true)
        .expect("extraction should succeed");

    assert_eq!(
        fs::read_to_string(target.join("plugin.toml")).unwrap(),
        "name = \"weather\""
    );
    assert_eq!(fs::read(target.join("lib").join("weather.bin")).unwrap(), [1, 2, 3]);
}

#[test]
fn test_extract_without_overwrite_keeps_existing_files() {
    let dir = TempDir::new().unwrap();
    let archive = packed_fixture(&dir);
    let target = dir.path().join("installed");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("plugin.toml"), "local edit").unwrap();

    TarGzArchiver::new()
        .extract_all(&archive, &target, false)
        .expect("extraction should succeed");

    assert_eq!(fs::read_to_string(target.join("plugin.toml")).unwrap(), "local edit");
    assert!(target.join("lib").join("weather.bin").is_file());
}

#[test]
fn test_extract_with_overwrite_replaces_existing_files() {
    let dir = TempDir::new().unwrap();
    let archive = packed_fixture(&dir);
    let target = dir.path().join("installed");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("plugin.toml"), "local edit").unwrap();

    TarGzArchiver::new()
        .extract_all(&archive, &target, true)
        .expect("extraction should succeed");

    assert_eq!(
        fs::read_to_string(target.join("plugin.toml")).unwrap(),
        "name = \"weather\""
    );
}

#[test]
fn test_missing_archive_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = TarGzArchiver::new()
        .extract_all(&dir.path().join("absent.tar.gz"), dir.path(), true)
        .unwrap_err();

    assert!(err.to_string().contains("absent.tar.gz"));
}

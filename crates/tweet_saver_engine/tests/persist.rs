use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tweet_saver_engine::{ensure_dir, AtomicFileWriter, FsVault, PersistError, Vault, WriteOutcome};

#[test]
fn ensure_dir_creates_missing_parents() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("a").join("b");
    assert!(ensure_dir(&nested).unwrap());
    assert!(nested.is_dir());
    assert!(!ensure_dir(&nested).unwrap());
}

#[test]
fn ensure_dir_rejects_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain");
    fs::write(&file, "x").unwrap();
    assert!(matches!(ensure_dir(&file), Err(PersistError::FolderIsFile(_))));
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write(Path::new("doc.md"), "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "doc.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write(Path::new("doc.md"), "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write(Path::new("doc.md"), "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("doc.md").exists());
}

#[test]
fn fs_vault_reports_created_then_overwritten() {
    let temp = TempDir::new().unwrap();
    let vault = FsVault::new(temp.path());
    let relative = Path::new("Tweets").join("note....md");

    vault.create_folder(Path::new("Tweets")).unwrap();
    assert!(vault.exists(Path::new("Tweets")));
    assert!(!vault.exists(&relative));

    assert_eq!(vault.write(&relative, "one").unwrap(), WriteOutcome::Created);
    assert_eq!(vault.write(&relative, "two").unwrap(), WriteOutcome::Overwritten);
    assert_eq!(fs::read_to_string(temp.path().join(&relative)).unwrap(), "two");
}

#[test]
fn fs_vault_leaves_existing_folder_content_alone() {
    let temp = TempDir::new().unwrap();
    let vault = FsVault::new(temp.path());
    let keep = temp.path().join("Tweets").join("keep.md");
    fs::create_dir_all(keep.parent().unwrap()).unwrap();
    fs::write(&keep, "old").unwrap();

    vault.create_folder(Path::new("Tweets")).unwrap();
    assert_eq!(fs::read_to_string(&keep).unwrap(), "old");
}

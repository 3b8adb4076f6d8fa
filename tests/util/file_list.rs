// Directory expansion for recursive mode.

use std::fs;

use infback::util::create_file_list;
use tempfile::TempDir;

#[test]
fn mixed_files_and_directories_in_argument_order() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("d/e")).unwrap();
    fs::write(root.join("d/z.deflate"), b"").unwrap();
    fs::write(root.join("d/e/y.deflate"), b"").unwrap();
    fs::write(root.join("d/skip.gz"), b"").unwrap();
    fs::write(root.join("loose.bin"), b"").unwrap();

    let list = create_file_list(&[root.join("loose.bin"), root.join("d")]).unwrap();
    assert_eq!(
        list,
        vec![
            root.join("loose.bin"),
            root.join("d/e/y.deflate"),
            root.join("d/z.deflate"),
        ]
    );
}

#[test]
fn empty_directory_yields_nothing() {
    let dir = TempDir::new().unwrap();
    assert!(create_file_list(&[dir.path()]).unwrap().is_empty());
}

#[test]
fn missing_path_is_passed_through() {
    let list = create_file_list(&["/no/such/file.deflate"]).unwrap();
    assert_eq!(list.len(), 1);
}

// File kind checks and metadata copying.

use std::fs;

use filetime::FileTime;
use infback::util::{copy_file_times, is_directory, is_reg_file};
use tempfile::TempDir;

#[test]
fn kinds() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("f");
    fs::write(&file, b"x").unwrap();
    assert!(is_reg_file(&file));
    assert!(!is_directory(&file));
    assert!(is_directory(dir.path()));
    assert!(!is_reg_file(dir.path()));
    assert!(!is_reg_file(&dir.path().join("absent")));
}

#[test]
fn times_are_copied() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::write(&src, b"a").unwrap();
    fs::write(&dst, b"b").unwrap();
    let stamp = FileTime::from_unix_time(1_234_567_890, 0);
    filetime::set_file_times(&src, stamp, stamp).unwrap();

    copy_file_times(&src, &dst).unwrap();
    let meta = fs::metadata(&dst).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), stamp);
}

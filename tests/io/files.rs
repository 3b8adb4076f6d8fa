// File-level decompression: naming, overwrite policy, test mode, batches.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::DeflateEncoder;
use flate2::Compression;
use infback::io::{
    decompress_filename, decompress_multiple_filenames, output_filename, Prefs, NUL_MARK,
};
use tempfile::TempDir;

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn write_deflate(dir: &Path, name: &str, data: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, deflate(data)).unwrap();
    path.to_str().unwrap().to_owned()
}

#[test]
fn single_file_to_derived_name() {
    let dir = TempDir::new().unwrap();
    let src = write_deflate(dir.path(), "notes.txt.deflate", b"some notes\n");
    let dst = output_filename(&src);
    assert!(dst.ends_with("notes.txt"));

    let stats = decompress_filename(&src, &dst, &Prefs::default()).unwrap();
    assert_eq!(stats.bytes_out, 11);
    assert_eq!(fs::read(&dst).unwrap(), b"some notes\n");
}

#[test]
fn existing_output_is_kept_without_overwrite() {
    let dir = TempDir::new().unwrap();
    let src = write_deflate(dir.path(), "a.deflate", b"new contents");
    let dst = dir.path().join("a");
    fs::write(&dst, b"old").unwrap();
    let dst = dst.to_str().unwrap();

    let mut prefs = Prefs::default();
    let err = decompress_filename(&src, dst, &prefs).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    assert_eq!(fs::read(dst).unwrap(), b"old");

    prefs.set_overwrite(true);
    decompress_filename(&src, dst, &prefs).unwrap();
    assert_eq!(fs::read(dst).unwrap(), b"new contents");
}

#[test]
fn test_mode_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let src = write_deflate(dir.path(), "t.deflate", b"payload");
    let mut prefs = Prefs::default();
    prefs.set_test_mode(true);
    let stats = decompress_filename(&src, NUL_MARK, &prefs).unwrap();
    assert_eq!(stats.bytes_out, 7);
    assert!(!dir.path().join("t").exists());
}

#[test]
fn truncated_file_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let mut compressed = deflate(&vec![b'q'; 50_000]);
    compressed.pop();
    let src = dir.path().join("cut.deflate");
    fs::write(&src, compressed).unwrap();
    let dst = dir.path().join("cut");

    let err = decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default())
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    assert!(!dst.exists());
}

#[test]
fn batch_in_parallel_counts_failures() {
    let dir = TempDir::new().unwrap();
    let mut srcs = Vec::new();
    for i in 0..6 {
        let body = format!("file number {}\n", i).repeat(100);
        srcs.push(write_deflate(dir.path(), &format!("f{}.deflate", i), body.as_bytes()));
    }
    let missing = dir.path().join("missing.deflate");
    srcs.push(missing.to_str().unwrap().to_owned());

    let mut prefs = Prefs::default();
    prefs.set_nb_workers(3);
    assert_eq!(decompress_multiple_filenames(&srcs, false, &prefs), 1);
    for i in 0..6 {
        let out = fs::read(dir.path().join(format!("f{}", i))).unwrap();
        assert_eq!(out, format!("file number {}\n", i).repeat(100).as_bytes());
    }
}

#[cfg(unix)]
#[test]
fn output_takes_input_mtime() {
    let dir = TempDir::new().unwrap();
    let src = write_deflate(dir.path(), "old.deflate", b"aged");
    let then = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(&src, then).unwrap();

    let dst = dir.path().join("old");
    decompress_filename(&src, dst.to_str().unwrap(), &Prefs::default()).unwrap();
    let meta = fs::metadata(&dst).unwrap();
    assert_eq!(filetime::FileTime::from_last_modification_time(&meta), then);
}

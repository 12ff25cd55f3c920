//! File-level build, compress and decompress runs over scratch directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use word_huffman::files::collect_files;
use word_huffman::{CodecConfig, HuffmanCodec, HuffmanError};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_sample_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let original = fs::read("contents/sample.txt").unwrap();
    let input = dir.path().join("sample.txt");
    fs::write(&input, &original).unwrap();

    let codec = HuffmanCodec::build_from_files(&[input.clone()], CodecConfig::default()).unwrap();
    // the sample contains the word "$n"
    assert_eq!(codec.codebook().escape(), "$$");

    let book = dir.path().join("HuffmanCodebook");
    codec.write_codebook(&book).unwrap();

    let loaded = HuffmanCodec::from_codebook_file(&book, CodecConfig::default()).unwrap();
    let compressed = loaded.compress_files(&[input.clone()]).unwrap();
    assert_eq!(compressed, vec![dir.path().join("sample.txt.hcz")]);

    let bits = fs::read(&compressed[0]).unwrap();
    assert!(bits.iter().all(|&b| b == b'0' || b == b'1'));

    fs::remove_file(&input).unwrap();
    let restored = loaded.decompress_files(&compressed).unwrap();
    assert_eq!(restored, vec![input.clone()]);
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn test_recursive_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("corpus");
    write(&root, "b.txt", "second file\n");
    write(&root, "a.txt", "first file");
    write(&root, "nested/c.txt", "nested\tfile  here\n");
    write(&root, ".DS_Store", "junk");

    let inputs = collect_files(&root, true).unwrap();
    let names: Vec<String> = inputs
        .iter()
        .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "nested/c.txt"]);

    let codec = HuffmanCodec::build_from_files(&inputs, CodecConfig::default()).unwrap();
    let compressed = codec.compress_files(&inputs).unwrap();
    assert_eq!(compressed.len(), 3);

    // a second pass over the tree skips what is already compressed
    let everything = collect_files(&root, true).unwrap();
    assert_eq!(everything.len(), 6);
    let again = codec.compress_files(&everything).unwrap();
    assert_eq!(again.len(), 3);

    let originals: Vec<Vec<u8>> = inputs.iter().map(|p| fs::read(p).unwrap()).collect();
    for p in &inputs {
        fs::remove_file(p).unwrap();
    }
    let restored = codec.decompress_files(&collect_files(&root, true).unwrap()).unwrap();
    assert_eq!(restored, inputs);
    for (p, want) in inputs.iter().zip(originals) {
        assert_eq!(fs::read(p).unwrap(), want);
    }
}

#[test]
fn test_directory_without_recursive_flag() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "x");
    let err = collect_files(dir.path(), false).unwrap_err();
    assert!(matches!(err, HuffmanError::InvalidUsage(_)));
}

#[test]
fn test_sole_compressed_input_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "a.txt", "x y");
    let codec = HuffmanCodec::build_from_files(&[input.clone()], CodecConfig::default()).unwrap();
    let compressed = codec.compress_files(&[input.clone()]).unwrap();

    let err = codec.compress_files(&compressed).unwrap_err();
    assert!(matches!(err, HuffmanError::InvalidUsage(_)));
    let err = codec.decompress_files(&[input]).unwrap_err();
    assert!(matches!(err, HuffmanError::InvalidUsage(_)));
}

#[test]
fn test_unknown_word_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let known = write(dir.path(), "known.txt", "red green blue");
    let unknown = write(dir.path(), "unknown.txt", "red purple");
    let codec = HuffmanCodec::build_from_files(&[known], CodecConfig::default()).unwrap();

    let err = codec.compress_files(&[unknown.clone()]).unwrap_err();
    assert!(matches!(err, HuffmanError::CodebookMismatch(_)));
    assert!(!dir.path().join("unknown.txt.hcz").exists());
}

#[test]
fn test_corrupt_compressed_file() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "a.txt", "one two two three three three");
    let codec = HuffmanCodec::build_from_files(&[input.clone()], CodecConfig::default()).unwrap();
    let compressed = codec.compress_files(&[input]).unwrap();

    let mut bits = fs::read(&compressed[0]).unwrap();
    bits.push(b'2');
    fs::write(&compressed[0], &bits).unwrap();
    let err = codec.decompress_files(&compressed).unwrap_err();
    assert!(matches!(err, HuffmanError::CorruptStream { .. }));
}

#[test]
fn test_missing_codebook_and_input() {
    let dir = TempDir::new().unwrap();
    let err = HuffmanCodec::from_codebook_file(&dir.path().join("nope"), CodecConfig::default()).unwrap_err();
    assert!(matches!(err, HuffmanError::MissingInput { .. }));

    let err = HuffmanCodec::build_from_files(&[dir.path().join("gone.txt")], CodecConfig::default()).unwrap_err();
    assert!(matches!(err, HuffmanError::MissingInput { .. }));
}

#[test]
fn test_malformed_codebook_file() {
    let dir = TempDir::new().unwrap();
    let book = write(dir.path(), "book", "$\n0\ta\n01\tb\n");
    let err = HuffmanCodec::from_codebook_file(&book, CodecConfig::default()).unwrap_err();
    assert!(matches!(err, HuffmanError::MalformedCodebook { .. }));
}

#[test]
fn test_custom_suffix() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "notes.md", "# title\n\nbody text\n");
    let config = CodecConfig::default().with_suffix(".bits");
    let codec = HuffmanCodec::build_from_files(&[input.clone()], config).unwrap();
    let out = codec.compress_files(&[input.clone()]).unwrap();
    assert_eq!(out, vec![dir.path().join("notes.md.bits")]);
}

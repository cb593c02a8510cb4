mod common;

use common::{block_pattern, copy_to, write_corrupt, write_jpeg};
use image::DynamicImage;
use similar_images_core::deduplication::CollectingReporter;
use similar_images_core::processing::{HashError, PerceptualHasher, Resize};
use similar_images_core::{Config, Error, Finding, ImageScanner, PHash};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

fn scanner(config: Config) -> (ImageScanner, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::new());
    let scanner = ImageScanner::new(config).with_reporter(reporter.clone());
    (scanner, reporter)
}

/// Hasher that fails on every call and counts them
#[derive(Default)]
struct FailingHasher {
    calls: AtomicUsize,
}

impl PerceptualHasher for FailingHasher {
    fn hash(&self, _: &DynamicImage, _: Resize<'_>) -> Result<PHash, HashError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(HashError::NonFinite)
    }
}

#[test]
fn test_identical_pair_and_unrelated_image() {
    let dir = tempdir().unwrap();
    let a = write_jpeg(dir.path(), "a.jpg", &block_pattern(1, 256));
    let b = copy_to(&a, dir.path(), "b.jpg");
    let c = write_jpeg(dir.path(), "c.jpg", &block_pattern(2, 256));

    let (scanner, reporter) = scanner(Config::default());
    let summary = scanner.run(dir.path()).unwrap();

    let findings = reporter.findings();
    assert_eq!(findings.len(), 1, "{findings:?}");
    assert!(findings[0].is_exact());
    assert!(findings[0].involves(&a) && findings[0].involves(&b));
    assert!(!findings.iter().any(|f| f.involves(&c)));

    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.fingerprinted, 3);
    assert_eq!(summary.exact_duplicates, 1);
    assert_eq!(summary.close_matches, 0);
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();

    let (scanner, reporter) = scanner(Config::default());
    let summary = scanner.run(dir.path()).unwrap();

    assert_eq!(summary.findings(), 0);
    assert_eq!(summary.discovered, 0);
    assert!(reporter.findings().is_empty());
}

#[test]
fn test_corrupt_file_aborts_scan() {
    let dir = tempdir().unwrap();
    for seed in 0..4 {
        write_jpeg(dir.path(), &format!("ok{seed}.jpg"), &block_pattern(seed, 64));
    }
    let bad = write_corrupt(dir.path(), "bad.jpg");

    let (scanner, _) = scanner(Config::default());
    match scanner.run(dir.path()) {
        Err(Error::Decode { path, .. }) => assert_eq!(path, bad),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_missing_root_is_traversal_error() {
    let dir = tempdir().unwrap();
    let (scanner, _) = scanner(Config::default());

    let result = scanner.run(dir.path().join("nope"));
    assert!(matches!(result, Err(Error::Traversal(_))));
}

#[test]
fn test_invalid_config_is_rejected_before_scanning() {
    let dir = tempdir().unwrap();
    let config = Config {
        threshold: 1000,
        ..Default::default()
    };
    let (scanner, _) = scanner(config);

    assert!(matches!(scanner.run(dir.path()), Err(Error::Configuration(_))));
}

#[test]
fn test_worker_failure_reports_nothing() {
    let dir = tempdir().unwrap();
    let a = write_jpeg(dir.path(), "a.jpg", &block_pattern(3, 64));
    for i in 0..5 {
        copy_to(&a, dir.path(), &format!("copy{i}.jpg"));
    }

    let config = Config {
        workers: 1,
        ..Default::default()
    };
    let hasher = Arc::new(FailingHasher::default());
    let (scanner, reporter) = scanner(config);
    let scanner = scanner.with_hasher(hasher.clone());

    let result = scanner.run(dir.path());
    assert!(matches!(result, Err(Error::Fingerprint { .. })));
    assert!(reporter.findings().is_empty());
    // The failing worker was the only consumer: nothing else got hashed
    assert_eq!(hasher.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_first_error_is_the_one_returned() {
    let dir = tempdir().unwrap();
    for i in 0..8 {
        write_corrupt(dir.path(), &format!("bad{i}.jpg"));
    }

    let config = Config {
        workers: 4,
        channel_capacity: 8,
        ..Default::default()
    };
    let (scanner, _) = scanner(config);

    // Several workers may fail; exactly one error comes back
    assert!(matches!(scanner.run(dir.path()), Err(Error::Decode { .. })));
}

#[test]
fn test_only_jpeg_files_are_scanned() {
    let dir = tempdir().unwrap();
    let img = block_pattern(4, 64);
    let png = dir.path().join("a.png");
    img.save_with_format(&png, image::ImageFormat::Png).unwrap();
    copy_to(&png, dir.path(), "b.png");
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    write_jpeg(dir.path(), "only.jpg", &img);

    let (scanner, reporter) = scanner(Config::default());
    let summary = scanner.run(dir.path()).unwrap();

    assert_eq!(summary.discovered, 1);
    assert!(reporter.findings().is_empty());
}

#[test]
fn test_nested_directories_and_uppercase_extensions() {
    let dir = tempdir().unwrap();
    let a = write_jpeg(dir.path(), "one/two/a.JPG", &block_pattern(5, 128));
    let b = copy_to(&a, dir.path(), "B.JPEG");

    let (scanner, reporter) = scanner(Config::default());
    scanner.run(dir.path()).unwrap();

    let findings = reporter.findings();
    assert_eq!(findings.len(), 1);
    assert!(findings[0].involves(&a) && findings[0].involves(&b));
}

#[test]
fn test_resized_copy_is_reported() {
    let dir = tempdir().unwrap();
    let img = block_pattern(6, 256);
    let big = write_jpeg(dir.path(), "big.jpg", &img);
    let small = write_jpeg(
        dir.path(),
        "small.jpg",
        &img.resize_exact(128, 128, image::imageops::FilterType::Lanczos3),
    );

    let (scanner, reporter) = scanner(Config::default());
    scanner.run(dir.path()).unwrap();

    let findings = reporter.findings();
    assert_eq!(findings.len(), 1, "{findings:?}");
    assert!(findings[0].involves(&big) && findings[0].involves(&small));
    if let Finding::CloseMatch { distance, .. } = &findings[0] {
        assert!(*distance <= 5);
    }
}

#[test]
fn test_zero_threshold_only_reports_exact() {
    let dir = tempdir().unwrap();
    let a = write_jpeg(dir.path(), "a.jpg", &block_pattern(7, 128));
    copy_to(&a, dir.path(), "b.jpg");
    write_jpeg(dir.path(), "c.jpg", &block_pattern(8, 128));

    let config = Config {
        threshold: 0,
        workers: 2,
        ..Default::default()
    };
    let (scanner, reporter) = scanner(config);
    scanner.run(dir.path()).unwrap();

    let findings = reporter.findings();
    assert!(findings.iter().all(Finding::is_exact));
    assert_eq!(findings.len(), 1);
}

#[test]
fn test_many_copies_each_reported_once() {
    let dir = tempdir().unwrap();
    let original = write_jpeg(dir.path(), "original.jpg", &block_pattern(9, 64));
    for i in 0..6 {
        copy_to(&original, dir.path(), &format!("copy{i}.jpg"));
    }

    let config = Config {
        channel_capacity: 4,
        ..Default::default()
    };
    let (scanner, reporter) = scanner(config);
    let summary = scanner.run(dir.path()).unwrap();

    // Seven identical files: the first one indexed, six duplicates of it
    assert_eq!(summary.exact_duplicates, 6);
    let findings = reporter.findings();
    let first = findings[0].paths().1.to_path_buf();
    assert!(findings.iter().all(|f| f.paths().1 == first.as_path()));
    assert!(findings.iter().all(|f| f.paths().0 != Path::new(&first)));
}

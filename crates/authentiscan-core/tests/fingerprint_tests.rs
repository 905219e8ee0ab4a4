//! Tests file fingerprint stability.

use authentiscan_core::{MediaFile, MediaSelection, MediaType, build_preview};

#[test]
fn fingerprint_tests_stable_for_identical_uploads() {
    let file_a = MediaFile::new("cat.png", "image/png", vec![3; 64]).expect("file should be valid");
    let file_b = MediaFile::new("copy.png", "image/png", vec![3; 64]).expect("file should be valid");

    assert_eq!(
        file_a.fingerprint(MediaType::Image),
        file_b.fingerprint(MediaType::Image)
    );
    assert_eq!(file_a.fingerprint(MediaType::Image).len(), 64);
}

#[test]
fn fingerprint_tests_differ_by_media_type() {
    let file = MediaFile::new("clip.bin", "video/mp4", vec![9; 16]).expect("file should be valid");
    assert_ne!(
        file.fingerprint(MediaType::Image),
        file.fingerprint(MediaType::Video)
    );
}

#[test]
fn fingerprint_tests_prepared_selection_reuses_one_hash() {
    let file = MediaFile::new("clip.mp4", "video/mp4", vec![5; 128]).expect("file should be valid");
    let expected = file.fingerprint(MediaType::Video);

    let selection = MediaSelection::prepare(MediaType::Video, file.clone());

    assert_eq!(selection.fingerprint, expected);
    assert_eq!(selection.preview, build_preview(MediaType::Video, &file));
    assert!(selection.preview.src().ends_with(&expected[..16]));
}

use mapsweep_ingest::{
    AnnotationKind, ArchiveNormalizer, AreaNameExtractor, IngestError, UploadedAnnotation,
};
use mapsweep_test_utils::{kml_document, kml_with_names, kmz_with_kml, kmz_without_kml, zip_archive};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn candidates_for(upload: &UploadedAnnotation) -> Vec<String> {
    let payload = ArchiveNormalizer::new().normalize(upload).unwrap();
    AreaNameExtractor::new().extract(&payload.text).to_vec()
}

#[test]
fn duplicate_placemark_names_collapse() {
    let upload = UploadedAnnotation::new("wards.kml", kml_with_names(&["Ward 7", "Ward 7"]));
    assert_eq!(candidates_for(&upload), vec!["Ward 7"]);
}

#[test]
fn kmz_and_kml_with_same_document_agree() {
    let kml = kml_with_names(&["Ward 7", "Ward 9"]);
    let plain = UploadedAnnotation::new("wards.kml", kml.clone());
    let packed = UploadedAnnotation::new("wards.KMZ", kmz_with_kml(&kml));

    assert_eq!(candidates_for(&plain), candidates_for(&packed));
    assert_eq!(
        ArchiveNormalizer::new().normalize(&packed).unwrap().kind,
        AnnotationKind::Kmz
    );
}

#[test]
fn kmz_without_markup_entry_rejected() {
    let upload = UploadedAnnotation::new("wards.kmz", kmz_without_kml());
    let err = ArchiveNormalizer::new().normalize(&upload).unwrap_err();
    assert!(matches!(err, IngestError::NoMarkupEntryFound));
}

#[test]
fn empty_zip_has_no_markup_entry() {
    let upload = UploadedAnnotation::new("wards.kmz", zip_archive(&[]));
    let err = ArchiveNormalizer::new().normalize(&upload).unwrap_err();
    assert!(matches!(err, IngestError::NoMarkupEntryFound));
}

#[test]
fn first_kml_entry_wins_and_match_is_case_insensitive() {
    let first = kml_with_names(&["First"]);
    let second = kml_with_names(&["Second"]);
    let bytes = zip_archive(&[
        ("notes.kml.txt", &b"<name>Decoy</name>"[..]),
        ("layers/", &b""[..]),
        ("layers/A.KML", first.as_bytes()),
        ("doc.kml", second.as_bytes()),
    ]);

    let upload = UploadedAnnotation::new("bundle.kmz", bytes);
    assert_eq!(candidates_for(&upload), vec!["First"]);
}

/// Rewrite the compression method of the first entry in both its local
/// header and its central directory record
fn with_first_entry_method(mut bytes: Vec<u8>, method: u16) -> Vec<u8> {
    let find = |sig: &[u8]| bytes.windows(4).position(|w| w == sig).unwrap();
    let local = find(b"PK\x03\x04");
    let central = find(b"PK\x01\x02");
    bytes[local + 8..local + 10].copy_from_slice(&method.to_le_bytes());
    bytes[central + 10..central + 12].copy_from_slice(&method.to_le_bytes());
    bytes
}

#[test]
fn unreadable_asset_before_kml_entry_is_ignored() {
    let kml = kml_with_names(&["Ward 5"]);
    let bytes = zip_archive(&[
        ("files/icon.png", &b"\x89PNG fake"[..]),
        ("doc.kml", kml.as_bytes()),
    ]);
    // 12 is bzip2, not compiled in
    let upload = UploadedAnnotation::new("wards.kmz", with_first_entry_method(bytes, 12));

    assert_eq!(candidates_for(&upload), vec!["Ward 5"]);
}

#[test]
fn oversized_entry_rejected() {
    let kml = kml_with_names(&["Ward 7"]);
    let upload = UploadedAnnotation::new("wards.kmz", kmz_with_kml(&kml));

    let err = ArchiveNormalizer::new()
        .with_max_entry_bytes(16)
        .normalize(&upload)
        .unwrap_err();
    assert!(matches!(err, IngestError::EntryTooLarge { limit: 16, .. }));
}

#[test]
fn long_description_alone_yields_nothing() {
    let body = format!(
        "    <Placemark><description>{}</description></Placemark>",
        "z".repeat(150)
    );
    let upload = UploadedAnnotation::new("wards.kml", kml_document(&body));
    assert!(candidates_for(&upload).is_empty());
}

#[test]
fn malformed_region_does_not_abort_scan() {
    let body = r#"
    <Placemark><name>Ward 1</name>
    <Placemark><name>Unclosed <Point><coordinates>1,2</coordinates></Point>
    <Placemark><ExtendedData><SimpleData name="ward">Ward 2</SimpleData></ExtendedData></Placemark>
    <Placemark><description>Ward 3</description></Placemark>"#;
    let upload = UploadedAnnotation::new("broken.kml", kml_document(body));

    assert_eq!(candidates_for(&upload), vec!["Ward 1", "Ward 2", "Ward 3"]);
}

proptest! {
    #[test]
    fn prop_plain_markup_is_identity(text in "\\PC{0,200}") {
        let upload = UploadedAnnotation::new("any.kml", text.clone());
        let payload = ArchiveNormalizer::new().normalize(&upload).unwrap();
        prop_assert_eq!(payload.text, text);
    }

    #[test]
    fn prop_extraction_is_deterministic_and_deduplicated(
        name in "[A-Za-z][A-Za-z0-9 ]{0,20}[A-Za-z0-9]",
        repeats in 1usize..8,
    ) {
        let names = vec![name.as_str(); repeats];
        let kml = kml_with_names(&names);

        let extractor = AreaNameExtractor::new();
        let first = extractor.extract(&kml);
        let second = extractor.extract(&kml);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 1);
        prop_assert!(first.contains(&name));
    }
}

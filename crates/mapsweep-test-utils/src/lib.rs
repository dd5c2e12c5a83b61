//! Testing utilities for Mapsweep workspace
//!
//! Shared fixtures: KML documents, KMZ archives and seeded catalogs.

#![allow(missing_docs)]

use mapsweep_catalog::{InMemoryCatalog, MapRecord, NewMapRecord};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Wrap body markup in a namespaced KML document
pub fn kml_document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
{body}
  </Document>
</kml>"#
    )
}

/// One `<Placemark>` per name
pub fn placemarks(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("    <Placemark><name>{name}</name></Placemark>"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// KML document with one placemark per name
pub fn kml_with_names(names: &[&str]) -> String {
    kml_document(&placemarks(names))
}

/// Build a zip archive from `(entry name, bytes)` pairs; names ending in
/// `/` become directories
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).expect("add directory");
        } else {
            writer.start_file(*name, options).expect("start file");
            writer.write_all(bytes).expect("write entry");
        }
    }

    writer.finish().expect("finish archive").into_inner()
}

/// KMZ archive with the document at `doc.kml` plus an icon asset
pub fn kmz_with_kml(kml: &str) -> Vec<u8> {
    zip_archive(&[
        ("files/", &b""[..]),
        ("files/icon.png", &b"\x89PNG fake"[..]),
        ("doc.kml", kml.as_bytes()),
    ])
}

/// KMZ archive holding only non-KML assets
pub fn kmz_without_kml() -> Vec<u8> {
    zip_archive(&[
        ("files/icon.png", &b"\x89PNG fake"[..]),
        ("readme.txt", &b"no markup here"[..]),
    ])
}

/// In-memory catalog seeded with `(area name, map type, file name)` rows
pub fn seeded_catalog(rows: &[(&str, &str, &str)]) -> (InMemoryCatalog, Vec<MapRecord>) {
    let catalog = InMemoryCatalog::new();
    let records = rows
        .iter()
        .map(|(area, map_type, file)| {
            catalog.insert(
                NewMapRecord::new(*area)
                    .with_map_type(*map_type)
                    .with_file_name(*file),
            )
        })
        .collect();
    (catalog, records)
}

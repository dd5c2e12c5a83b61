//! Archive normalizer
//!
//! Turns an uploaded KML or KMZ file into a single markup payload. KML is
//! decoded as-is; KMZ is opened as a zip archive and the first entry whose
//! name ends in `.kml` is decoded.

use crate::error::{IngestError, IngestResult};
use crate::format::{AnnotationKind, UploadedAnnotation, KML_EXTENSION};
use std::io::{Cursor, Read};

/// Default ceiling for a decompressed KML entry (100 MB)
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 100_000_000;

/// Markup text produced by normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupPayload {
    /// Which container the markup came from
    pub kind: AnnotationKind,
    /// Decoded markup text
    pub text: String,
}

/// Normalizes KML/KMZ uploads into markup text
#[derive(Debug, Clone, Copy)]
pub struct ArchiveNormalizer {
    max_entry_bytes: u64,
}

impl Default for ArchiveNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveNormalizer {
    /// Create normalizer with the default entry ceiling
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }

    /// With a custom ceiling for the decompressed KML entry
    #[inline]
    #[must_use]
    pub fn with_max_entry_bytes(mut self, limit: u64) -> Self {
        self.max_entry_bytes = limit;
        self
    }

    /// Normalize an upload into markup text
    ///
    /// # Errors
    /// - [`IngestError::UnsupportedFormat`] if the filename is not KML/KMZ
    /// - [`IngestError::MalformedArchive`] if a KMZ cannot be opened or read
    /// - [`IngestError::NoMarkupEntryFound`] if a KMZ holds no `.kml` entry
    /// - [`IngestError::EntryTooLarge`] if the entry exceeds the ceiling
    pub fn normalize(&self, upload: &UploadedAnnotation) -> IngestResult<MarkupPayload> {
        let kind = upload.kind()?;
        let text = match kind {
            AnnotationKind::Kml => decode_text(&upload.bytes),
            AnnotationKind::Kmz => self.read_kml_entry(&upload.bytes)?,
        };

        tracing::debug!(
            filename = %upload.filename,
            kind = %kind,
            chars = text.len(),
            "normalized annotation upload"
        );

        Ok(MarkupPayload { kind, text })
    }

    fn read_kml_entry(&self, bytes: &[u8]) -> IngestResult<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let suffix = format!(".{KML_EXTENSION}");

        // select from the central directory; only the chosen entry is decompressed
        let index = (0..archive.len())
            .find(|&i| {
                archive
                    .name_for_index(i)
                    .is_some_and(|name| name.to_ascii_lowercase().ends_with(&suffix))
            })
            .ok_or(IngestError::NoMarkupEntryFound)?;

        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        let size = entry.size();
        if size > self.max_entry_bytes {
            return Err(IngestError::EntryTooLarge {
                entry: name,
                size,
                limit: self.max_entry_bytes,
            });
        }

        tracing::debug!(entry = %name, size, "found KML entry in archive");

        // Declared sizes can lie; never read past the ceiling.
        let mut buf = Vec::new();
        (&mut entry)
            .take(self.max_entry_bytes + 1)
            .read_to_end(&mut buf)
            .map_err(IngestError::malformed)?;
        if buf.len() as u64 > self.max_entry_bytes {
            return Err(IngestError::EntryTooLarge {
                entry: name,
                size: buf.len() as u64,
                limit: self.max_entry_bytes,
            });
        }

        Ok(decode_text(&buf))
    }
}

/// Decode bytes as UTF-8, replacing invalid sequences
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kml_passes_through_unchanged() {
        let body = "<kml><Placemark><name>Ward 7</name></Placemark></kml>";
        let upload = UploadedAnnotation::new("wards.kml", body.as_bytes());

        let payload = ArchiveNormalizer::new().normalize(&upload).unwrap();
        assert_eq!(payload.kind, AnnotationKind::Kml);
        assert_eq!(payload.text, body);
    }

    #[test]
    fn kmz_garbage_is_malformed() {
        let upload = UploadedAnnotation::new("wards.kmz", b"definitely not a zip".to_vec());

        let err = ArchiveNormalizer::new().normalize(&upload).unwrap_err();
        assert!(matches!(err, IngestError::MalformedArchive(_)));
    }

    #[test]
    fn unsupported_extension_rejected_before_decoding() {
        let upload = UploadedAnnotation::new("wards.txt", b"<name>x</name>".to_vec());

        let err = ArchiveNormalizer::new().normalize(&upload).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let mut bytes = b"<name>Ward ".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"</name>");
        let upload = UploadedAnnotation::new("wards.kml", bytes);

        let payload = ArchiveNormalizer::new().normalize(&upload).unwrap();
        assert!(payload.text.starts_with("<name>Ward "));
        assert!(payload.text.contains('\u{FFFD}'));
    }
}

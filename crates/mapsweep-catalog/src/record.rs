//! Map catalog records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, unique identifier of a catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub i64);

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted map asset
///
/// Field names serialize in the catalog's column spelling
/// (`MapID`, `AreaName`, `MapType`, `FileName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRecord {
    /// Unique identifier
    #[serde(rename = "MapID")]
    pub map_id: MapId,
    /// Area the map covers; matched byte-for-byte
    #[serde(rename = "AreaName")]
    pub area_name: String,
    /// Free-form map classification
    #[serde(rename = "MapType")]
    pub map_type: String,
    /// Stored file name of the map asset
    #[serde(rename = "FileName")]
    pub file_name: String,
}

/// Record fields before an identifier is assigned
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewMapRecord {
    /// Area name
    pub area_name: String,
    /// Map classification
    pub map_type: String,
    /// Stored file name
    pub file_name: String,
}

impl NewMapRecord {
    /// Create a record for an area, with empty type and file name
    #[inline]
    #[must_use]
    pub fn new(area_name: impl Into<String>) -> Self {
        Self {
            area_name: area_name.into(),
            ..Self::default()
        }
    }

    /// With map type
    #[inline]
    #[must_use]
    pub fn with_map_type(mut self, map_type: impl Into<String>) -> Self {
        self.map_type = map_type.into();
        self
    }

    /// With file name
    #[inline]
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Attach an identifier
    #[must_use]
    pub fn into_record(self, map_id: MapId) -> MapRecord {
        MapRecord {
            map_id,
            area_name: self.area_name,
            map_type: self.map_type,
            file_name: self.file_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_column_names() {
        let record = NewMapRecord::new("Ward 7")
            .with_map_type("Zoning")
            .with_file_name("ward7.pdf")
            .into_record(MapId(12));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["MapID"], 12);
        assert_eq!(json["AreaName"], "Ward 7");
        assert_eq!(json["MapType"], "Zoning");
        assert_eq!(json["FileName"], "ward7.pdf");
    }
}

//! Reconciliation reports and response bodies

use crate::error::ReconcileError;
use mapsweep_catalog::MapRecord;
use mapsweep_ingest::{AnnotationKind, CandidateSet};
use serde::Serialize;
use serde_json::Value;

/// Successful outcome of one delete-by-annotation-file request
///
/// `matching_maps` is the pre-deletion snapshot. Without concurrent
/// writers, `deleted_count == matching_maps.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    /// Always `true`
    pub success: bool,
    /// Summary for the operator
    pub message: String,
    /// Rows actually removed
    pub deleted_count: u64,
    /// Container the markup came from
    pub file_type: AnnotationKind,
    /// Every candidate extracted from the file
    #[serde(rename = "areaNamesFromKML")]
    pub area_names: CandidateSet,
    /// Records matched before deletion
    pub matching_maps: Vec<MapRecord>,
    /// Set when nothing was deleted on purpose
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
}

impl ReconciliationReport {
    /// Report for a completed deletion
    #[must_use]
    pub fn deleted(
        file_type: AnnotationKind,
        area_names: CandidateSet,
        matching_maps: Vec<MapRecord>,
        deleted_count: u64,
    ) -> Self {
        let message = if matching_maps.is_empty() {
            "No maps found matching the KML area names".to_string()
        } else {
            format!("Deleted {deleted_count} map(s) matching the KML area names")
        };
        Self {
            success: true,
            message,
            deleted_count,
            file_type,
            area_names,
            matching_maps,
            dry_run: false,
        }
    }

    /// Report for a preview that deleted nothing
    #[must_use]
    pub fn preview(
        file_type: AnnotationKind,
        area_names: CandidateSet,
        matching_maps: Vec<MapRecord>,
    ) -> Self {
        let message = format!("{} map(s) would be deleted", matching_maps.len());
        Self {
            success: true,
            message,
            deleted_count: 0,
            file_type,
            area_names,
            matching_maps,
            dry_run: true,
        }
    }
}

/// Body returned for any failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureResponse {
    /// Always `false`
    pub success: bool,
    /// Reason, specific per validation case
    pub message: String,
}

impl From<&ReconcileError> for FailureResponse {
    fn from(err: &ReconcileError) -> Self {
        Self {
            success: false,
            message: err.user_message(),
        }
    }
}

/// Transport-neutral reply: status code plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    /// HTTP-equivalent status
    pub status: u16,
    /// JSON body
    pub body: Value,
}

impl ApiReply {
    /// Map a pipeline result onto a status and body
    #[must_use]
    pub fn from_result(result: &Result<ReconciliationReport, ReconcileError>) -> Self {
        match result {
            Ok(report) => Self {
                status: 200,
                body: serde_json::to_value(report).unwrap_or(Value::Null),
            },
            Err(err) => Self {
                status: err.status_code(),
                body: serde_json::to_value(FailureResponse::from(err)).unwrap_or(Value::Null),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFailure;
    use mapsweep_catalog::{MapId, NewMapRecord};
    use serde_json::json;

    fn names(list: &[&str]) -> CandidateSet {
        list.iter().copied().collect()
    }

    #[test]
    fn success_body_shape() {
        let record = NewMapRecord::new("Ward 7")
            .with_map_type("Zoning")
            .with_file_name("w7.pdf")
            .into_record(MapId(3));
        let report = ReconciliationReport::deleted(
            AnnotationKind::Kml,
            names(&["Ward 7", "Ward 9"]),
            vec![record],
            1,
        );

        let reply = ApiReply::from_result(&Ok(report));
        assert_eq!(reply.status, 200);
        assert_eq!(
            reply.body,
            json!({
                "success": true,
                "message": "Deleted 1 map(s) matching the KML area names",
                "deletedCount": 1,
                "fileType": "KML",
                "areaNamesFromKML": ["Ward 7", "Ward 9"],
                "matchingMaps": [
                    { "MapID": 3, "AreaName": "Ward 7", "MapType": "Zoning", "FileName": "w7.pdf" }
                ]
            })
        );
    }

    #[test]
    fn preview_flags_dry_run() {
        let report = ReconciliationReport::preview(AnnotationKind::Kmz, names(&["A"]), Vec::new());
        let body = serde_json::to_value(&report).unwrap();
        assert_eq!(body["dryRun"], true);
        assert_eq!(body["deletedCount"], 0);
        assert_eq!(body["fileType"], "KMZ");
    }

    #[test]
    fn failure_body_shape() {
        let err = ReconcileError::from(ValidationFailure::NoMarkupEntryFound);
        let reply = ApiReply::from_result(&Err(err));
        assert_eq!(reply.status, 400);
        assert_eq!(
            reply.body,
            json!({ "success": false, "message": "No KML file found inside the KMZ archive" })
        );
    }
}

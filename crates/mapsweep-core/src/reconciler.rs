//! Delete-by-annotation-file pipeline
//!
//! Permission gate → normalize → extract → match → delete → report.
//! Every step runs sequentially within the request; the first failure
//! ends it.

use crate::auth::{Capability, PermissionChecker, StaticPermissions};
use crate::config::ServiceConfig;
use crate::error::{ReconcileError, ReconcileResult, ValidationFailure};
use crate::report::ReconciliationReport;
use mapsweep_catalog::MapCatalog;
use mapsweep_ingest::{
    AnnotationKind, ArchiveNormalizer, AreaNameExtractor, CandidateSet, UploadedAnnotation,
};
use std::sync::Arc;

/// Whether matched records are removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepMode {
    Delete,
    Preview,
}

impl SweepMode {
    const fn capability(self) -> Capability {
        match self {
            Self::Delete => Capability::DeleteMaps,
            Self::Preview => Capability::ReadMaps,
        }
    }
}

/// Reconciles uploaded KML/KMZ files against the map catalog
pub struct AnnotationReconciler {
    catalog: Arc<dyn MapCatalog>,
    permissions: Arc<dyn PermissionChecker>,
    normalizer: ArchiveNormalizer,
    extractor: AreaNameExtractor,
}

impl std::fmt::Debug for AnnotationReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationReconciler")
            .field("normalizer", &self.normalizer)
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl AnnotationReconciler {
    /// Create reconciler over a catalog and permission collaborator
    #[must_use]
    pub fn new(catalog: Arc<dyn MapCatalog>, permissions: Arc<dyn PermissionChecker>) -> Self {
        Self {
            catalog,
            permissions,
            normalizer: ArchiveNormalizer::new(),
            extractor: AreaNameExtractor::new(),
        }
    }

    /// Create reconciler using the config's permission table and limits
    #[must_use]
    pub fn from_config(config: &ServiceConfig, catalog: Arc<dyn MapCatalog>) -> Self {
        let permissions = Arc::new(StaticPermissions::from_grants(&config.permissions));
        Self::new(catalog, permissions).with_normalizer(
            ArchiveNormalizer::new().with_max_entry_bytes(config.max_entry_bytes),
        )
    }

    /// With a different permission collaborator
    #[inline]
    #[must_use]
    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = permissions;
        self
    }

    /// With a custom normalizer
    #[inline]
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: ArchiveNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// With a custom extractor
    #[inline]
    #[must_use]
    pub fn with_extractor(mut self, extractor: AreaNameExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Delete every catalog record whose area name appears in the upload
    ///
    /// # Errors
    /// - [`ReconcileError::Unauthorized`] if `principal` lacks `maps:delete`
    /// - [`ReconcileError::Validation`] for a missing, unsupported or
    ///   unreadable file, or one with no area names
    /// - [`ReconcileError::Store`] if the catalog query or delete fails
    pub async fn delete_by_annotation_file(
        &self,
        principal: Option<&str>,
        upload: Option<UploadedAnnotation>,
    ) -> ReconcileResult<ReconciliationReport> {
        self.run(principal, upload, SweepMode::Delete).await
    }

    /// Report what [`Self::delete_by_annotation_file`] would delete
    ///
    /// # Errors
    /// Same as [`Self::delete_by_annotation_file`], gated on `maps:read`
    pub async fn preview(
        &self,
        principal: Option<&str>,
        upload: Option<UploadedAnnotation>,
    ) -> ReconcileResult<ReconciliationReport> {
        self.run(principal, upload, SweepMode::Preview).await
    }

    /// Normalize and extract without touching the catalog
    ///
    /// # Errors
    /// Returns [`ReconcileError::Validation`] for unreadable uploads. An
    /// empty candidate set is returned as-is, not as an error.
    pub fn extract(&self, upload: &UploadedAnnotation) -> ReconcileResult<(AnnotationKind, CandidateSet)> {
        let payload = self.normalizer.normalize(upload)?;
        Ok((payload.kind, self.extractor.extract(&payload.text)))
    }

    async fn run(
        &self,
        principal: Option<&str>,
        upload: Option<UploadedAnnotation>,
        mode: SweepMode,
    ) -> ReconcileResult<ReconciliationReport> {
        let capability = mode.capability();
        let decision = self.permissions.check(principal, capability).await;
        if !decision.allowed {
            tracing::warn!(principal = principal.unwrap_or("<anonymous>"), %capability, "permission denied");
            return Err(ReconcileError::Unauthorized(
                decision
                    .reason
                    .unwrap_or_else(|| capability.denial_reason().to_string()),
            ));
        }

        let upload = upload.ok_or(ValidationFailure::MissingFile)?;
        let (kind, candidates) = self.extract(&upload).map_err(|e| {
            tracing::warn!(filename = %upload.filename, error = %e, "rejected annotation upload");
            e
        })?;

        if candidates.is_empty() {
            tracing::warn!(filename = %upload.filename, "no area names found");
            return Err(ValidationFailure::NoAreaNames.into());
        }
        tracing::debug!(filename = %upload.filename, kind = %kind, candidates = candidates.len(), "extracted candidates");

        let names = candidates.to_vec();
        let report = match mode {
            SweepMode::Delete => {
                let outcome = self.catalog.find_and_delete(&names).await.map_err(|e| {
                    tracing::error!(error = %e, "catalog sweep failed");
                    ReconcileError::Store(e)
                })?;
                if outcome.deleted != outcome.matched.len() as u64 {
                    tracing::warn!(
                        matched = outcome.matched.len(),
                        deleted = outcome.deleted,
                        "deleted count differs from matched count; concurrent catalog change?"
                    );
                }
                ReconciliationReport::deleted(kind, candidates, outcome.matched, outcome.deleted)
            }
            SweepMode::Preview => {
                let matched = self.catalog.find_by_area_names(&names).await.map_err(|e| {
                    tracing::error!(error = %e, "catalog match failed");
                    ReconcileError::Store(e)
                })?;
                ReconciliationReport::preview(kind, candidates, matched)
            }
        };

        tracing::info!(
            principal = principal.unwrap_or("<anonymous>"),
            filename = %upload.filename,
            file_type = %kind,
            candidates = report.area_names.len(),
            matched = report.matching_maps.len(),
            deleted = report.deleted_count,
            dry_run = report.dry_run,
            "annotation reconciliation complete"
        );
        Ok(report)
    }
}

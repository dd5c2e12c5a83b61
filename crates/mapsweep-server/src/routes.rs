//! HTTP routes
//!
//! - `POST /api/maps/delete-by-kml`: multipart upload, deletes matches
//! - `POST /api/maps/delete-by-kml/preview`: same upload, deletes nothing
//! - `GET /health`
//!
//! The caller is identified by the `x-operator` header. Every response,
//! including transport rejections, is JSON.

use futures::TryStreamExt;
use mapsweep_core::{
    AnnotationReconciler, ApiReply, FailureResponse, ReconcileError, ServiceConfig,
    ValidationFailure,
};
use mapsweep_ingest::UploadedAnnotation;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Buf;
use warp::multipart::FormData;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Header naming the calling principal
pub const OPERATOR_HEADER: &str = "x-operator";

/// Shared state for one sweep route
#[derive(Clone)]
struct SweepRoute {
    reconciler: Arc<AnnotationReconciler>,
    field: Arc<str>,
    dry_run: bool,
}

/// All routes, with rejections recovered into JSON failures
pub fn routes(
    reconciler: Arc<AnnotationReconciler>,
    config: &ServiceConfig,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let field: Arc<str> = Arc::from(config.upload_field.as_str());
    let route = |dry_run| SweepRoute {
        reconciler: reconciler.clone(),
        field: field.clone(),
        dry_run,
    };

    let delete = warp::path!("api" / "maps" / "delete-by-kml")
        .and(upload(config.max_upload_bytes))
        .and(with_state(route(false)))
        .and_then(run_sweep);
    let preview = warp::path!("api" / "maps" / "delete-by-kml" / "preview")
        .and(upload(config.max_upload_bytes))
        .and(with_state(route(true)))
        .and_then(run_sweep);

    health()
        .or(delete)
        .or(preview)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// `GET /health`
pub fn health() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("health").and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "ok",
            "version": crate::VERSION,
        }))
    })
}

fn upload(
    max_bytes: u64,
) -> impl Filter<Extract = (Option<String>, FormData), Error = Rejection> + Clone {
    warp::post()
        .and(warp::header::optional::<String>(OPERATOR_HEADER))
        .and(warp::multipart::form().max_length(max_bytes))
}

fn with_state<T>(state: T) -> impl Filter<Extract = (T,), Error = Infallible> + Clone
where
    T: Clone + Send + Sync + 'static,
{
    warp::any().map(move || state.clone())
}

async fn run_sweep(
    principal: Option<String>,
    form: FormData,
    route: SweepRoute,
) -> Result<Response, Infallible> {
    let result = match read_upload(form, &route.field).await {
        Ok(upload) if route.dry_run => route.reconciler.preview(principal.as_deref(), upload).await,
        Ok(upload) => {
            route
                .reconciler
                .delete_by_annotation_file(principal.as_deref(), upload)
                .await
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to read multipart body");
            Err(ReconcileError::from(ValidationFailure::UnreadableUpload(err.to_string())))
        }
    };
    Ok(into_response(&ApiReply::from_result(&result)))
}

/// Pull the first part named `field` that carries a filename
async fn read_upload(
    mut form: FormData,
    field: &str,
) -> Result<Option<UploadedAnnotation>, warp::Error> {
    while let Some(part) = form.try_next().await? {
        if part.name() != field {
            continue;
        }
        let Some(filename) = part.filename().map(str::to_owned) else {
            continue;
        };
        let bytes = part
            .stream()
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(chunk.chunk());
                Ok(acc)
            })
            .await?;
        tracing::debug!(%filename, size = bytes.len(), "received upload");
        return Ok(Some(UploadedAnnotation::new(filename, bytes)));
    }
    Ok(None)
}

fn into_response(reply: &ApiReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(warp::reply::json(&reply.body), status).into_response()
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body = FailureResponse {
        success: false,
        message: message.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let response = if err.is_not_found() {
        failure(StatusCode::NOT_FOUND, "Not found")
    } else if let Some(too_large) = err.find::<warp::reject::PayloadTooLarge>() {
        failure(
            StatusCode::BAD_REQUEST,
            ValidationFailure::PayloadTooLarge(too_large.to_string()).to_string(),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        failure(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.find::<warp::reject::MissingHeader>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
        || err.find::<warp::reject::UnsupportedMediaType>().is_some()
    {
        failure(StatusCode::BAD_REQUEST, ValidationFailure::MissingFile.to_string())
    } else {
        tracing::error!(rejection = ?err, "unhandled rejection");
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };
    Ok(response)
}

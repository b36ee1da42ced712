use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::appetite::{AppetiteRequestPayload, AssessmentCategory};

use super::domain::{AssessmentDocument, AssessmentId};
use super::repository::AssessmentRepository;
use super::service::{AssessmentService, AssessmentServiceError, EvaluationRequest};

/// Router builder exposing band, calculation, guardrail and assessment
/// endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/bands",
            get(bands_handler::<R>).put(update_bands_handler::<R>),
        )
        .route("/api/v1/appetite/calculate", post(calculate_handler::<R>))
        .route("/api/v1/appetite/evaluate", post(evaluate_handler::<R>))
        .route(
            "/api/v1/assessments",
            post(save_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/assessments/:assessment_id", get(show_handler::<R>))
        .route(
            "/api/v1/assessments/:assessment_id/report",
            get(report_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    category: Option<String>,
}

pub(crate) async fn bands_handler<R>(State(service): State<Arc<AssessmentService<R>>>) -> Response
where
    R: AssessmentRepository + 'static,
{
    match run_blocking(service, |service| Ok(service.bands())).await {
        Ok(bands) => (StatusCode::OK, axum::Json(json!({ "bands": bands }))).into_response(),
        Err(err) => error_response(err),
    }
}

/// Replaces the band file with the YAML request body after validating it.
pub(crate) async fn update_bands_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    body: String,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match run_blocking(service, move |service| service.update_bands(&body)).await {
        Ok(bands) => (StatusCode::OK, axum::Json(json!({ "bands": bands }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn calculate_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(payload): axum::Json<AppetiteRequestPayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match run_blocking(service, move |service| service.calculate(payload)).await {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match run_blocking(service, move |service| service.evaluate(request)).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn save_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(document): axum::Json<AssessmentDocument>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match run_blocking(service, move |service| service.save(document)).await {
        Ok(stored) => {
            let payload = json!({
                "id": stored.id,
                "saved_at": stored.saved_at,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let category = match query.category.as_deref() {
        None => None,
        Some(raw) => match AssessmentCategory::from_label(raw) {
            Some(category) => Some(category),
            None => {
                let payload = json!({
                    "error": format!("unknown category '{raw}'"),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
    };

    match run_blocking(service, move |service| service.list(category)).await {
        Ok(summaries) => (StatusCode::OK, axum::Json(summaries)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn show_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let Ok(id) = assessment_id.parse::<AssessmentId>() else {
        return not_found(&assessment_id);
    };

    match run_blocking(service, move |service| service.get(&id)).await {
        Ok(document) => (StatusCode::OK, axum::Json(document)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let Ok(id) = assessment_id.parse::<AssessmentId>() else {
        return not_found(&assessment_id);
    };

    match run_blocking(service, move |service| service.report(&id)).await {
        Ok(markdown) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            markdown,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Band files and the assessment store live on disk, so service calls run
/// on the blocking pool.
async fn run_blocking<R, T, F>(
    service: Arc<AssessmentService<R>>,
    work: F,
) -> Result<T, AssessmentServiceError>
where
    R: AssessmentRepository + 'static,
    T: Send + 'static,
    F: FnOnce(&AssessmentService<R>) -> Result<T, AssessmentServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&service))
        .await
        .map_err(|err| AssessmentServiceError::Worker(err.to_string()))?
}

fn not_found(raw_id: &str) -> Response {
    let payload = json!({
        "error": format!("assessment {raw_id} not found"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = match &err {
        AssessmentServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Bands(band_err) if band_err.is_invalid_content() => {
            StatusCode::BAD_REQUEST
        }
        AssessmentServiceError::Bands(_)
        | AssessmentServiceError::Repository(_)
        | AssessmentServiceError::Render(_)
        | AssessmentServiceError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{JobUpdate, NewJob};
use crate::error::ApiError;
use crate::filter::{FilterSpec, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult};

use super::{query_pairs, update_body};

/// GET /jobs - List jobs
///
/// Optional query filters: `title` (case-insensitive substring), `minSalary`,
/// `hasEquity` (`true` limits to jobs with non-zero equity).
///
/// Authorization: none
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Value> {
    let filter = FilterSpec::from_query(ResourceKind::Job, query_pairs(query.as_deref()))?;
    let jobs = state.jobs.find_all(&filter).await?;
    Ok(ApiResponse::success(json!({ "jobs": jobs })))
}

/// GET /jobs/:id
///
/// Authorization: none
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let job = state.jobs.get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// POST /jobs - Create a job
///
/// Body: `{ title, salary?, equity?, companyHandle }`
///
/// Authorization: admin
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = body?;
    let data: NewJob = serde_json::from_value(body)?;
    data.validate()?;

    let job = state.jobs.create(&data).await?;
    tracing::info!("Created job {} for {}", job.id, job.company_handle);
    Ok(ApiResponse::created(json!({ "job": job })))
}

/// PATCH /jobs/:id - Partially update a job
///
/// Body may contain any of `{ title, salary, equity }`.
///
/// Authorization: admin
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let attributes = update_body(body, JobUpdate::NOT_NULL)?;
    let shape: JobUpdate = serde_json::from_value(Value::Object(attributes.clone()))?;
    shape.validate()?;

    let job = state.jobs.update(id, &attributes).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// DELETE /jobs/:id
///
/// Authorization: admin
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    state.jobs.remove(id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid job id: {}", raw)))
}

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{CompanyUpdate, NewCompany};
use crate::filter::{FilterSpec, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult};

use super::{query_pairs, update_body};

/// GET /companies - List companies
///
/// Optional query filters: `name` (case-insensitive substring),
/// `minEmployees`, `maxEmployees`.
///
/// Authorization: none
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Value> {
    let filter = FilterSpec::from_query(ResourceKind::Company, query_pairs(query.as_deref()))?;
    let companies = state.companies.find_all(&filter).await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// GET /companies/:handle - Company with its jobs
///
/// Authorization: none
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    let company = state.companies.get(&handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// POST /companies - Create a company
///
/// Body: `{ handle, name, description, numEmployees?, logoUrl? }`
///
/// Authorization: admin
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = body?;
    let data: NewCompany = serde_json::from_value(body)?;
    data.validate()?;

    let company = state.companies.create(&data).await?;
    tracing::info!("Created company {}", company.handle);
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// PATCH /companies/:handle - Partially update a company
///
/// Body may contain any of `{ name, description, numEmployees, logoUrl }`.
///
/// Authorization: admin
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = body?;
    let attributes = update_body(body, CompanyUpdate::NOT_NULL)?;
    let shape: CompanyUpdate = serde_json::from_value(Value::Object(attributes.clone()))?;
    shape.validate()?;

    let company = state.companies.update(&handle, &attributes).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:handle
///
/// Authorization: admin
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    state.companies.remove(&handle).await?;
    tracing::info!("Deleted company {}", handle);
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}

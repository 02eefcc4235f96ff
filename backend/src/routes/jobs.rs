//! Job routes
//!
//! Listing and reading single jobs are public. Creating, listing one's own
//! jobs, updating and deleting require a bearer token; update and delete are
//! owner only.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::JobService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use job_tracker_shared::{CreateJobRequest, JobResponse, UpdateJobRequest};
use uuid::Uuid;

/// Create job routes
pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/user", get(list_user_jobs))
        .route("/:id", get(get_job).patch(update_job).delete(delete_job))
}

fn parse_job_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::Validation("Invalid job ID".to_string()))
}

/// GET /jobs - All jobs
async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<JobResponse>>> {
    let jobs = JobService::list_jobs(state.db()).await?;
    Ok(Json(jobs.into_iter().map(JobResponse::from).collect()))
}

/// GET /jobs/user - Jobs created by the caller
async fn list_user_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<JobResponse>>> {
    let jobs = JobService::list_user_jobs(state.db(), &auth.username).await?;
    Ok(Json(jobs.into_iter().map(JobResponse::from).collect()))
}

/// GET /jobs/:id - A single job
async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let job_id = parse_job_id(&id)?;
    let job = JobService::get_job(state.db(), job_id).await?;
    Ok(Json(job.into()))
}

/// POST /jobs - Create a job owned by the caller
async fn create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let Json(req) = payload?;
    let job = JobService::create_job(state.db(), &auth.username, req).await?;
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// PATCH /jobs/:id - Update a job the caller owns
async fn update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> ApiResult<Json<JobResponse>> {
    let job_id = parse_job_id(&id)?;
    let Json(req) = payload?;
    let job = JobService::update_job(state.db(), &auth.username, job_id, req).await?;
    Ok(Json(job.into()))
}

/// DELETE /jobs/:id - Delete a job the caller owns
async fn delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let job_id = parse_job_id(&id)?;
    let job = JobService::delete_job(state.db(), &auth.username, job_id).await?;
    Ok(Json(job.into()))
}

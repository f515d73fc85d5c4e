//! Staff job board: available jobs, acceptance, rejection, start, complete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_job_accepted, record_status_transition};
use crate::middleware::user_auth::ActorContext;
use domain::models::assignment::AcceptJobResponse;
use domain::models::booking::{BookingResponse, BookingStatus};
use domain::services::audit::{AuditSink, StatusChangeAudit, TracingAuditSink};
use persistence::repositories::{AssignmentRepository, BookingRepository};

/// Open jobs in the calling staff member's coverage area.
///
/// GET /api/v1/staff/jobs/available
///
/// Confirmed bookings only, minus anything this staff member has already
/// accepted or rejected; ordered soonest first.
pub async fn list_available_jobs(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let repo = AssignmentRepository::new(state.pool.clone());
    let entities = repo.list_available_jobs(actor.user_id).await?;

    Ok(Json(
        entities
            .into_iter()
            .map(|e| e.into_domain().into())
            .collect(),
    ))
}

/// Jobs the calling staff member has accepted.
///
/// GET /api/v1/staff/jobs
pub async fn list_my_jobs(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let repo = AssignmentRepository::new(state.pool.clone());
    let entities = repo.list_staff_jobs(actor.user_id).await?;

    Ok(Json(
        entities
            .into_iter()
            .map(|e| e.into_domain().into())
            .collect(),
    ))
}

/// Accept an open job.
///
/// POST /api/v1/staff/jobs/:bookingId/accept
///
/// Fails closed on capacity: when the last slot is contested, exactly one
/// acceptance wins and the rest receive a capacity error.
pub async fn accept_job(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AcceptJobResponse>), ApiError> {
    let repo = AssignmentRepository::new(state.pool.clone());
    let outcome = repo.accept_job(booking_id, actor.user_id).await?;

    record_job_accepted();
    info!(
        booking_id = %booking_id,
        staff_id = %actor.user_id,
        booking_assigned = outcome.booking_assigned,
        "Job accepted"
    );

    let response = AcceptJobResponse {
        assignment: outcome.assignment.into_domain(),
        booking_assigned: outcome.booking_assigned,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Decline an open job, permanently removing it from the caller's list.
///
/// POST /api/v1/staff/jobs/:bookingId/reject
pub async fn reject_job(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = AssignmentRepository::new(state.pool.clone());
    repo.reject_job(booking_id, actor.user_id).await?;

    info!(booking_id = %booking_id, staff_id = %actor.user_id, "Job rejected");

    Ok(StatusCode::NO_CONTENT)
}

/// Start an assigned job.
///
/// POST /api/v1/staff/jobs/:bookingId/start
pub async fn start_job(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    staff_transition(
        &state,
        &actor,
        booking_id,
        BookingStatus::Assigned,
        BookingStatus::InProgress,
    )
    .await
}

/// Complete a job in progress.
///
/// POST /api/v1/staff/jobs/:bookingId/complete
pub async fn complete_job(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    staff_transition(
        &state,
        &actor,
        booking_id,
        BookingStatus::InProgress,
        BookingStatus::Completed,
    )
    .await
}

/// Shared start/complete path: verify the accepted assignment, then apply a
/// guarded transition. A failed guard re-reads the row so the error names
/// the actual current status.
async fn staff_transition(
    state: &AppState,
    actor: &ActorContext,
    booking_id: Uuid,
    expected: BookingStatus,
    target: BookingStatus,
) -> Result<Json<BookingResponse>, ApiError> {
    let assignments = AssignmentRepository::new(state.pool.clone());
    if !assignments.has_accepted(booking_id, actor.user_id).await? {
        return Err(ApiError::Forbidden(
            "No accepted assignment on this booking".to_string(),
        ));
    }

    let bookings = BookingRepository::new(state.pool.clone());
    let updated = bookings
        .update_status_guarded(booking_id, expected.as_str(), target.as_str())
        .await?;

    let updated = match updated {
        Some(entity) => entity,
        None => {
            let fresh = bookings
                .find_by_id(booking_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;
            let from = fresh
                .status
                .parse::<BookingStatus>()
                .unwrap_or(BookingStatus::Pending);
            return Err(ApiError::InvalidTransition { from, to: target });
        }
    };

    record_status_transition(target.as_str(), false);
    TracingAuditSink.record(&StatusChangeAudit::transition(
        updated.id,
        updated.booking_number.clone(),
        actor.user_id,
        actor.role,
        expected,
        target,
    ));

    Ok(Json(updated.into_domain().into()))
}

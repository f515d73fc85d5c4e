//! Booking endpoints: creation, retrieval, status updates, rating.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_booking_created, record_status_transition};
use crate::middleware::user_auth::ActorContext;
use domain::models::booking::{
    validate_booking_pricing, BookingResponse, BookingStatus, CreateBookingRequest,
    CreateBookingResponse, UpdateBookingStatusRequest,
};
use domain::models::payment::{CreateRatingRequest, Rating};
use domain::models::role::AppRole;
use domain::services::access::{can_force_booking_status, can_mutate_booking_status};
use domain::services::audit::{AuditSink, StatusChangeAudit, TracingAuditSink};
use persistence::entities::BookingEntity;
use persistence::repositories::{
    AssignmentRepository, BookingInput, BookingRepository, PaymentRepository,
};

/// Create a booking.
///
/// POST /api/v1/bookings
///
/// The pricing invariants (total = base + add-ons, total >= minimum order)
/// are re-validated here regardless of any client-side pre-check; a failed
/// check rejects the request before any row is written.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), ApiError> {
    if actor.role == AppRole::Staff {
        return Err(ApiError::Forbidden(
            "Staff accounts cannot create bookings".to_string(),
        ));
    }

    request.validate()?;
    validate_booking_pricing(request.base_price, request.addon_price, request.total_price)?;

    let required_staff_count = request
        .required_staff_count
        .unwrap_or(state.config.booking.default_required_staff_count);

    let customer_user_id = if actor.role == AppRole::Customer {
        Some(actor.user_id)
    } else {
        None
    };

    let repo = BookingRepository::new(state.pool.clone());
    let entity = repo
        .create(BookingInput {
            package_id: request.package_id,
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            customer_phone: shared::validation::normalize_mobile(&request.customer_phone),
            customer_user_id,
            address_line1: request.address_line1,
            address_line2: request.address_line2,
            city: request.city,
            pincode: request.pincode,
            landmark: request.landmark,
            panchayath_id: request.panchayath_id,
            ward_number: request.ward_number,
            scheduled_date: request.scheduled_date,
            scheduled_time: request.scheduled_time,
            special_instructions: request.special_instructions,
            base_price: request.base_price,
            addon_price: request.addon_price,
            total_price: request.total_price,
            required_staff_count,
        })
        .await?;

    record_booking_created();
    info!(
        booking_id = %entity.id,
        booking_number = %entity.booking_number,
        total_price = entity.total_price,
        required_staff_count,
        "Booking created"
    );

    let response = CreateBookingResponse {
        id: entity.id,
        booking_number: entity.booking_number,
        status: BookingStatus::Pending,
        total_price: entity.total_price,
        created_at: entity.created_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a booking by ID.
///
/// GET /api/v1/bookings/:bookingId
///
/// Admins see every booking; customers their own; staff the bookings they
/// hold an accepted assignment on. Anything else reads as not found.
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    ensure_booking_visible(&state, &actor, &entity).await?;
    Ok(Json(entity.into_domain().into()))
}

/// Get a booking by its human-readable number, for customer self-service.
///
/// GET /api/v1/bookings/number/:bookingNumber
pub async fn get_booking_by_number(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(booking_number): Path<String>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let entity = repo
        .find_by_number(&booking_number)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    ensure_booking_visible(&state, &actor, &entity).await?;
    Ok(Json(entity.into_domain().into()))
}

/// List the calling customer's bookings, most recent first.
///
/// GET /api/v1/bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let entities = repo.list_for_customer(actor.user_id).await?;

    Ok(Json(
        entities
            .into_iter()
            .map(|e| e.into_domain().into())
            .collect(),
    ))
}

/// Update a booking's status.
///
/// PATCH /api/v1/bookings/:bookingId/status
///
/// Admins drive any transition the state machine allows; with `force` they
/// may set any status, and the override is reported through the audit hook.
/// Staff may only start or complete jobs they hold an accepted assignment
/// on. Customers cannot mutate status at all.
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let repo = BookingRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    let current = entity
        .status
        .parse::<BookingStatus>()
        .map_err(|_| ApiError::Internal("Invalid booking status in database".to_string()))?;
    let target = request.status;

    if actor.role == AppRole::Customer {
        return Err(ApiError::Forbidden(
            "Customers cannot update booking status".to_string(),
        ));
    }

    if actor.role == AppRole::Staff {
        let assignments = AssignmentRepository::new(state.pool.clone());
        if !assignments.has_accepted(booking_id, actor.user_id).await? {
            return Err(ApiError::Forbidden(
                "No accepted assignment on this booking".to_string(),
            ));
        }
    }

    let forced = request.force && can_force_booking_status(actor.role);
    if !forced && !can_mutate_booking_status(actor.role, current, target) {
        // Distinguish a transition the table forbids from one this role may
        // not request.
        if current.can_transition_to(target) {
            return Err(ApiError::Forbidden(format!(
                "Role {} may not apply this transition",
                actor.role
            )));
        }
        return Err(ApiError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    let updated = if forced {
        repo.update_status_forced(booking_id, target.as_str()).await?
    } else {
        repo.update_status_guarded(booking_id, current.as_str(), target.as_str())
            .await?
    };

    let updated = match updated {
        Some(entity) => entity,
        None => {
            // The row moved under us; re-read for an accurate error.
            let fresh = repo
                .find_by_id(booking_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;
            let fresh_status = fresh
                .status
                .parse::<BookingStatus>()
                .unwrap_or(BookingStatus::Pending);
            return Err(ApiError::InvalidTransition {
                from: fresh_status,
                to: target,
            });
        }
    };

    record_status_transition(target.as_str(), forced);

    let audit = if forced {
        StatusChangeAudit::admin_override(
            updated.id,
            updated.booking_number.clone(),
            actor.user_id,
            actor.role,
            current,
            target,
        )
    } else {
        StatusChangeAudit::transition(
            updated.id,
            updated.booking_number.clone(),
            actor.user_id,
            actor.role,
            current,
            target,
        )
    };
    TracingAuditSink.record(&audit);

    Ok(Json(updated.into_domain().into()))
}

/// Rate a completed booking.
///
/// POST /api/v1/bookings/:bookingId/rating
///
/// Only the booking's customer may rate, only once, and only after
/// completion.
pub async fn rate_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<CreateRatingRequest>,
) -> Result<(StatusCode, Json<Rating>), ApiError> {
    request.validate()?;

    let repo = BookingRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if entity.customer_user_id != Some(actor.user_id) {
        return Err(ApiError::NotFound("Booking not found".to_string()));
    }
    if entity.status != BookingStatus::Completed.as_str() {
        return Err(ApiError::Validation(
            "Only completed bookings can be rated".to_string(),
        ));
    }

    let payments = PaymentRepository::new(state.pool.clone());
    let rating = payments
        .create_rating(booking_id, request.rating, request.comment.as_deref())
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23505") {
                    return ApiError::Conflict("Booking already rated".to_string());
                }
            }
            e.into()
        })?;

    info!(booking_id = %booking_id, rating = request.rating, "Booking rated");

    Ok((StatusCode::CREATED, Json(rating.into())))
}

/// Visibility rule shared by the single-booking reads.
async fn ensure_booking_visible(
    state: &AppState,
    actor: &ActorContext,
    entity: &BookingEntity,
) -> Result<(), ApiError> {
    match actor.role {
        AppRole::SuperAdmin | AppRole::Admin => Ok(()),
        AppRole::Customer if entity.customer_user_id == Some(actor.user_id) => Ok(()),
        AppRole::Staff => {
            let assignments = AssignmentRepository::new(state.pool.clone());
            if assignments.has_accepted(entity.id, actor.user_id).await? {
                Ok(())
            } else {
                Err(ApiError::NotFound("Booking not found".to_string()))
            }
        }
        _ => Err(ApiError::NotFound("Booking not found".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_status_request_deserialization() {
        let request: UpdateBookingStatusRequest =
            serde_json::from_str(r#"{"status": "cancelled", "force": true}"#).unwrap();
        assert_eq!(request.status, BookingStatus::Cancelled);
        assert!(request.force);
    }

    #[test]
    fn test_create_booking_response_shape() {
        let response = CreateBookingResponse {
            id: Uuid::new_v4(),
            booking_number: "BK-250601-00123".to_string(),
            status: BookingStatus::Pending,
            total_price: 750,
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"totalPrice\":750"));
        assert!(json.contains("\"pending\""));
    }
}

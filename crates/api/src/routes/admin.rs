//! Admin dashboard endpoints: stats, booking list, tabs, payment finalization.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::ActorContext;
use domain::models::assignment::Assignment;
use domain::models::booking::{
    BookingListQuery, BookingListResponse, BookingPagination, BookingResponse, BookingStatus,
};
use domain::models::payment::{Payment, PaymentStatus, RecordPaymentRequest};
use domain::models::role::AdminTab;
use domain::services::access::can_view_tab;
use persistence::repositories::{
    AssignmentRepository, BookingPageQuery, BookingRepository, PaymentInput, PaymentRepository,
    UserRepository,
};
use shared::pagination::{clamp_limit, DateCursor};

/// Aggregate dashboard counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub today_bookings: i64,
    pub pending_bookings: i64,
    pub completed_bookings: i64,
    pub total_revenue: i64,
}

/// GET /api/v1/admin/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<AdminStatsResponse>, ApiError> {
    let stats = BookingRepository::new(state.pool.clone()).stats().await?;

    Ok(Json(AdminStatsResponse {
        today_bookings: stats.today_count,
        pending_bookings: stats.pending_count,
        completed_bookings: stats.completed_count,
        total_revenue: stats.total_revenue,
    }))
}

/// Paginated, status-filterable booking list.
///
/// GET /api/v1/admin/bookings?status=...&cursor=...&limit=...
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    if let Some(ref status) = query.status {
        status.parse::<BookingStatus>().map_err(|_| {
            ApiError::Validation(format!(
                "Invalid status filter: {}. Must be one of: pending, confirmed, assigned, in_progress, completed, cancelled",
                status
            ))
        })?;
    }

    let (cursor_date, cursor_id) = match query.cursor.as_deref() {
        Some(cursor) => {
            let decoded = DateCursor::decode(cursor)
                .map_err(|_| ApiError::Validation("Invalid cursor format".to_string()))?;
            (Some(decoded.date), Some(decoded.id))
        }
        None => (None, None),
    };

    let limit = clamp_limit(
        query.limit,
        state.config.booking.default_page_size,
        state.config.booking.max_page_size,
    );

    let repo = BookingRepository::new(state.pool.clone());
    let (entities, has_more) = repo
        .list_page(BookingPageQuery {
            status_filter: query.status.clone(),
            cursor_date,
            cursor_id,
            limit,
        })
        .await?;

    let next_cursor = if has_more {
        entities.last().map(|last| {
            DateCursor {
                date: last.scheduled_date,
                id: last.id,
            }
            .encode()
        })
    } else {
        None
    };

    let bookings: Vec<BookingResponse> = entities
        .into_iter()
        .map(|e| e.into_domain().into())
        .collect();

    Ok(Json(BookingListResponse {
        bookings,
        pagination: BookingPagination {
            next_cursor,
            has_more,
        },
    }))
}

/// Assignment rows for a booking, for the admin detail view.
///
/// GET /api/v1/admin/bookings/:bookingId/assignments
pub async fn list_booking_assignments(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let bookings = BookingRepository::new(state.pool.clone());
    if bookings.find_by_id(booking_id).await?.is_none() {
        return Err(ApiError::NotFound("Booking not found".to_string()));
    }

    let rows = AssignmentRepository::new(state.pool.clone())
        .list_for_booking(booking_id)
        .await?;

    Ok(Json(rows.into_iter().map(|e| e.into_domain()).collect()))
}

/// The admin dashboard tabs visible to the calling actor.
///
/// GET /api/v1/admin/tabs
pub async fn my_tabs(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
) -> Result<Json<Vec<AdminTab>>, ApiError> {
    let granted: std::collections::HashSet<AdminTab> = UserRepository::new(state.pool.clone())
        .admin_tabs(actor.user_id)
        .await?
        .iter()
        .filter_map(|tab| tab.parse::<AdminTab>().ok())
        .collect();

    let visible: Vec<AdminTab> = AdminTab::all()
        .iter()
        .copied()
        .filter(|tab| can_view_tab(actor.role, &granted, *tab))
        .collect();

    Ok(Json(visible))
}

/// Record a payment against a completed booking.
///
/// POST /api/v1/admin/bookings/:bookingId/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    request.validate()?;

    let bookings = BookingRepository::new(state.pool.clone());
    let booking = bookings
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    // Only completed bookings settle; completed is terminal, so the plain
    // check-then-insert cannot race a status regression.
    if booking.status != BookingStatus::Completed.as_str() {
        return Err(ApiError::Validation(
            "Payments can only be recorded for completed bookings".to_string(),
        ));
    }

    let (status, paid_at) = if request.mark_paid {
        (PaymentStatus::Paid, Some(Utc::now()))
    } else {
        (PaymentStatus::Pending, None)
    };

    let payment = PaymentRepository::new(state.pool.clone())
        .create(PaymentInput {
            booking_id,
            amount: request.amount,
            status: status.as_str().to_string(),
            payment_method: request.payment_method,
            transaction_id: request.transaction_id,
            paid_at,
        })
        .await?;

    info!(
        booking_id = %booking_id,
        amount = request.amount,
        status = %status,
        "Payment recorded"
    );

    Ok((StatusCode::CREATED, Json(payment.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_serialization() {
        let response = AdminStatsResponse {
            today_bookings: 4,
            pending_bookings: 2,
            completed_bookings: 31,
            total_revenue: 48_500,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"todayBookings\":4"));
        assert!(json.contains("\"totalRevenue\":48500"));
    }

    #[test]
    fn test_booking_list_query_deserialization() {
        let query: BookingListQuery =
            serde_json::from_str(r#"{"status": "confirmed", "limit": 10}"#).unwrap();
        assert_eq!(query.status.as_deref(), Some("confirmed"));
        assert_eq!(query.limit, Some(10));
        assert!(query.cursor.is_none());
    }
}

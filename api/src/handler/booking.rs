use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Query;
use chrono::Utc;
use garde::Validate;

use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBookingStatus},
        BookingStatus,
    },
    id::BookingId,
    trust::{self, TrustOutcome},
    user::ProfilePatch,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::extractor::{AuthorizedUser, ClientSession};
use crate::model::booking::{
    AvailabilityQuery, AvailabilityResponse, BookingFilterQuery, BookingResponse,
    BookingsResponse, CreateBookingRequest, CreatedBookingResponse, LinkedBookingsResponse,
    SetBookingOwnerRequest, StatusUpdatedResponse, SyncedBookingsResponse,
    UpdateBookingRequest, UpdateBookingStatusRequest,
};

pub async fn create_booking(
    session: ClientSession,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;
    let stay = req.stay();
    stay.validate_at(Utc::now())?;

    // only trusted users may skip the confirmation call, and only if they
    // asked for it explicitly
    let user = session.user();
    let status = match user {
        Some(auth)
            if auth.trust_level >= trust::SKIP_CONFIRMATION_MIN_LEVEL
                && req.book_without_confirmation =>
        {
            BookingStatus::Confirmed
        }
        _ => BookingStatus::Pending,
    };

    let event = CreateBooking::new(
        req.phone_number.clone(),
        req.physical_room_ids.clone(),
        stay,
        user.map(|auth| auth.user_id),
        status,
    );
    let booking_id = registry.booking_repository().create(event).await?;

    match user {
        Some(auth) => {
            // profile phone sync is best-effort: the booking is already
            // committed
            if req.save_phone {
                let patch = ProfilePatch {
                    phone_number: Some(req.phone_number.clone()),
                    ..Default::default()
                };
                if let Err(e) = registry
                    .user_profile_service()
                    .update(auth.user_id, &patch)
                    .await
                {
                    tracing::warn!(
                        error.message = %e,
                        user_id = %auth.user_id,
                        "failed to save the phone number to the user profile"
                    );
                }
            }
        }
        None => {
            // guests keep their booking ids in the session until the
            // bookings are claimed at login or registration
            let store = registry.session_store();
            let session_id = session.session_id.as_str();
            let mut state = store.find_guest_state(session_id).await?.unwrap_or_default();
            state.remember_booking(booking_id);
            state.phone_number = Some(req.phone_number.clone());
            store.save_guest_state(session_id, &state).await?;
        }
    }

    let message = match status {
        BookingStatus::Confirmed => "the booking has been confirmed, we look forward to your stay",
        _ => "the booking has been created and awaits confirmation",
    };
    Ok((
        StatusCode::CREATED,
        Json(CreatedBookingResponse {
            booking_id,
            status,
            message: message.into(),
        }),
    ))
}

pub async fn check_availability(
    State(registry): State<AppRegistry>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let available = registry
        .booking_repository()
        .is_available(&query.physical_room_ids, &query.stay())
        .await?;
    Ok(Json(AvailabilityResponse { available }))
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("booking {booking_id} was not found")))?;
    if !user.is_admin() && booking.booked_by != Some(user.id()) {
        return Err(AppError::ForbiddenOperation);
    }
    Ok(Json(BookingResponse::from(booking)))
}

pub async fn show_booking_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Query(filter): Query<BookingFilterQuery>,
) -> AppResult<Json<BookingsResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    registry
        .booking_repository()
        .find_all(filter.into())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_my_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_by_user_id(user.id())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;
    let event = req.into_event(booking_id)?;
    registry.booking_repository().update(event).await?;
    Ok(StatusCode::OK)
}

/// Applies a status transition and, when an owned booking completes for
/// the first time, adjusts the owner's reputation through the user
/// service. The reputation step is best-effort: the status change has
/// already committed and is never rolled back.
pub async fn update_booking_status(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> AppResult<Json<StatusUpdatedResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    let repo = registry.booking_repository();
    let booking = repo
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("booking {booking_id} was not found")))?;

    let old_status = repo
        .update_status(UpdateBookingStatus::new(booking_id, req.status))
        .await?;

    let mut message = String::from("the booking status has been updated");

    // the trust engine fires only on the first transition into Completed
    // of a booking that has an owner
    let completed_now =
        req.status == BookingStatus::Completed && old_status != BookingStatus::Completed;
    if let (Some(owner_id), true) = (booking.booked_by, completed_now) {
        match registry.user_profile_service().find_by_id(owner_id).await {
            Err(e) => {
                tracing::warn!(
                    error.message = %e,
                    user_id = %owner_id,
                    "user service unreachable, trust level left as-is"
                );
                message.push_str("; the trust level could not be adjusted");
            }
            Ok(None) => {
                tracing::warn!(user_id = %owner_id, "booking owner has no profile");
            }
            Ok(Some(profile)) => {
                let completed_count = repo.count_completed_by_user(owner_id).await?;
                let outcome = trust::evaluate(
                    profile.trust_level,
                    profile.consecutive_cancellations,
                    completed_count,
                );
                if let Some(patch) = outcome.into_patch() {
                    match registry.user_profile_service().update(owner_id, &patch).await {
                        Err(e) => {
                            tracing::warn!(
                                error.message = %e,
                                user_id = %owner_id,
                                "failed to push the trust update to the user service"
                            );
                            message.push_str("; the trust level could not be adjusted");
                        }
                        Ok(()) => match outcome {
                            TrustOutcome::PenaltyCleared => {
                                message.push_str("; the cancellation penalty has been cleared");
                            }
                            TrustOutcome::LevelRaised(level) => {
                                message.push_str(&format!(
                                    "; the trust level has been raised to {level}"
                                ));
                            }
                            TrustOutcome::Unchanged => {}
                        },
                    }
                }
            }
        }
    }

    Ok(Json(StatusUpdatedResponse {
        status: req.status,
        message,
    }))
}

pub async fn delete_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    let deleted = registry.booking_repository().delete(booking_id).await?;
    if !deleted {
        return Err(AppError::EntityNotFound(format!(
            "booking {booking_id} was not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Claims the guest bookings accumulated in the caller's session. Only
/// unowned bookings are linked, so replays are harmless.
pub async fn sync_guest_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SyncedBookingsResponse>> {
    let store = registry.session_store();
    let session_id = user.session_id.as_str();
    let mut state = store.find_guest_state(session_id).await?.unwrap_or_default();

    let linked_count = registry
        .booking_repository()
        .link_guest_bookings(user.id(), &state.guest_booking_ids)
        .await?;

    let message = if linked_count > 0 {
        format!("{linked_count} guest bookings have been linked to your account")
    } else {
        "there were no guest bookings to link".to_string()
    };
    if linked_count > 0 {
        state.booking_message = Some(message.clone());
    }
    state.guest_booking_ids.clear();
    store.save_guest_state(session_id, &state).await?;

    Ok(Json(SyncedBookingsResponse {
        linked_count,
        message,
    }))
}

/// Internal endpoint for the user service: reassigns booking ownership
/// regardless of the current owner.
pub async fn set_booking_owner(
    State(registry): State<AppRegistry>,
    Json(req): Json<SetBookingOwnerRequest>,
) -> AppResult<Json<LinkedBookingsResponse>> {
    let updated_count = registry
        .booking_repository()
        .reassign_owner(req.user_id, &req.booking_ids)
        .await?;
    Ok(Json(LinkedBookingsResponse { updated_count }))
}

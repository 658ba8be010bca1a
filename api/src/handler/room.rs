use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Query;
use garde::Validate;

use kernel::model::id::RoomTypeId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::extractor::AuthorizedUser;
use crate::model::room::{
    CreateRoomTypeRequest, RoomTypeFilterQuery, RoomTypeResponse, RoomTypesResponse,
    UpdateRoomTypeRequest,
};

pub async fn register_room_type(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRoomTypeRequest>,
) -> Result<StatusCode, AppError> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;
    registry
        .room_repository()
        .create(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn show_room_type_list(
    State(registry): State<AppRegistry>,
    Query(filter): Query<RoomTypeFilterQuery>,
) -> AppResult<Json<RoomTypesResponse>> {
    registry
        .room_repository()
        .find_all(filter.into())
        .await
        .map(RoomTypesResponse::from)
        .map(Json)
}

pub async fn show_room_type(
    Path(room_type_id): Path<RoomTypeId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomTypeResponse>> {
    registry
        .room_repository()
        .find_by_id(room_type_id)
        .await
        .and_then(|rt| match rt {
            Some(rt) => Ok(Json(RoomTypeResponse::from(rt))),
            None => Err(AppError::EntityNotFound(format!(
                "room type {room_type_id} was not found"
            ))),
        })
}

pub async fn update_room_type(
    user: AuthorizedUser,
    Path(room_type_id): Path<RoomTypeId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateRoomTypeRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;
    registry
        .room_repository()
        .update(req.into_event(room_type_id))
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_room_type(
    user: AuthorizedUser,
    Path(room_type_id): Path<RoomTypeId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    registry
        .room_repository()
        .delete(room_type_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

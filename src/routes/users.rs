use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    models::{
        status::Status,
        user::{AddUserRequest, UserListResponse},
    },
    AppState,
};

pub async fn add_user(
    State(state): State<AppState>,
    Json(body): Json<AddUserRequest>,
) -> Result<(StatusCode, Json<Value>), Status> {
    state.auth.add_user(&body.usr, &body.pwd).await?;
    Ok((StatusCode::CREATED, Json(json!({}))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(usr): Path<String>,
) -> Result<Json<Value>, Status> {
    state.auth.delete_user(&usr).await?;
    Ok(Json(json!({})))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, Status> {
    state.auth.list_users().await.map(Json)
}

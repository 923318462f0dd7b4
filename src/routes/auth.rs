use axum::{extract::State, Json};

use crate::{
    models::{
        auth::CallContext,
        status::Status,
        user::{LoginRequest, TokenResponse},
    },
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, Status> {
    state.auth.login(&body.usr, &body.pwd).await.map(Json)
}

/// Requires the current token in the `tkn` header.
pub async fn renew_token(
    State(state): State<AppState>,
    ctx: CallContext,
) -> Result<Json<TokenResponse>, Status> {
    state.auth.renew_token(&ctx).await.map(Json)
}

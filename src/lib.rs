pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use services::auth::AuthService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", get(routes::users::list_users).post(routes::users::add_user))
        .route("/users/login", post(routes::auth::login))
        .route("/users/token/renew", post(routes::auth::renew_token))
        .route("/users/{usr}", delete(routes::users::delete_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

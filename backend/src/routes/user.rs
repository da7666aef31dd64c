//! User route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::user::{create_user, delete_user, get_user, update_user};
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route(
            "/api/users/me",
            get(get_user).put(update_user).delete(delete_user),
        )
}

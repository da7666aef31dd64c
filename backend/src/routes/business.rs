//! Business record routes

use axum::{routing::get, Router};

use crate::handlers::business;
use crate::state::AppState;

pub fn business_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/businesses",
            get(business::list_businesses).post(business::create_business),
        )
        .route(
            "/api/businesses/:unique_id",
            get(business::get_business)
                .put(business::update_business)
                .delete(business::delete_business),
        )
}

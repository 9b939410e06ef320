use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::services::rate_limit;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        // the literal /search route must win over the :id wildcard
        .route("/bookings/search", get(handlers::bookings::search_bookings))
        .route(
            "/bookings/:id",
            get(handlers::bookings::get_booking)
                .put(handlers::bookings::update_booking)
                .delete(handlers::bookings::delete_booking),
        )
        .route("/health", get(handlers::health::health))
        .route("/catalog", get(handlers::catalog::catalog))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_requests,
        ));

    Router::new()
        .route("/", get(handlers::app::app_page))
        .route("/health", get(handlers::health::health))
        .nest("/api", api)
        .with_state(state)
}

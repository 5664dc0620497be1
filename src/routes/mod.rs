use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{admin, auth, events, health_check, venues};
use crate::state::AppState;

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::search_events))
        .route("/events/:id", get(events::get_event))
        .route("/venues", get(venues::list_venues))
        .route("/venues/:id", get(venues::get_venue))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/register/admin", post(auth::register_admin))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(admin::create_event))
        .route(
            "/events/:id",
            get(admin::get_event)
                .put(admin::update_event)
                .delete(admin::delete_event),
        )
        .route("/events/:id/publish", patch(admin::publish_event))
        .route("/events/:id/cancel", patch(admin::cancel_event))
        .route("/venues", post(admin::create_venue))
        .route(
            "/venues/:id",
            put(admin::update_venue).delete(admin::delete_venue),
        )
}

pub fn create_routes(state: AppState) -> Router {
    let security = create_security_headers_layer(state.config.production);
    let cors = create_cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api",
            public_routes()
                .nest("/auth", auth_routes())
                .nest("/admin", admin_routes()),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(security)
        .layer(cors)
}

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Department routes
        .route(
            "/department",
            get(handlers::department::list_departments)
                .post(handlers::department::create_department),
        )
        .route(
            "/department/:id",
            get(handlers::department::get_department)
                .put(handlers::department::update_department)
                .delete(handlers::department::delete_department),
        )
        // Person routes
        .route(
            "/person",
            get(handlers::person::list_persons).post(handlers::person::create_person),
        )
        .route(
            "/person/:id",
            get(handlers::person::get_person)
                .put(handlers::person::update_person)
                .delete(handlers::person::delete_person),
        )
        // Search
        .route("/search", get(handlers::search::search_persons))
        // Image routes
        .route("/images", get(handlers::image::get_images))
        .route("/image/:filename", delete(handlers::image::delete_image));

    // Static assets (public pages and uploaded images)
    let public_dir = state.config.data_dir.join("public");

    Router::new()
        .nest("/api", api_routes)
        .route("/.status", get(handlers::status::status))
        .route(
            "/upload",
            post(handlers::image::upload_image)
                .layer(DefaultBodyLimit::max(state.config.max_image_size)),
        )
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

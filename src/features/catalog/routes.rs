use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::catalog::handlers;
use crate::features::catalog::services::CatalogService;

/// Create routes for the catalog feature.
///
/// Reads are open to every authenticated user; handlers guard mutations
/// with `RequireAdmin`.
pub fn routes(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route(
            "/api/catalog/files",
            get(handlers::list_files).post(handlers::create_file),
        )
        .route(
            "/api/catalog/files/{id}",
            get(handlers::get_file)
                .put(handlers::update_file)
                .delete(handlers::delete_file),
        )
        .route("/api/catalog/files/{id}/open", get(handlers::open_file))
        .route("/api/catalog/files/{id}/form", get(handlers::edit_draft))
        .route("/api/catalog/files/{id}/pin", post(handlers::toggle_pin))
        .route("/api/catalog/form", get(handlers::create_draft))
        .with_state(service)
}

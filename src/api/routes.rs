use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers;
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/healthcheck", get(handlers::healthcheck::<S>))
        // Catalog queries
        .route("/pokemon", get(handlers::list_pokemon::<S>))
        .route("/pokemon", post(handlers::create_pokemon::<S>))
        .route("/pokemon/filter-by-type", get(handlers::filter_by_type::<S>))
        .route("/pokemon/:id", get(handlers::get_pokemon::<S>))
        .route("/pokemon/:id/suggest", get(handlers::suggest_weak_pokemon::<S>))
}

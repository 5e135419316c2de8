use axum::{
    Router,
    handler::Handler,
    http::{HeaderValue, Method},
    routing::{MethodRouter, get},
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::spoonacular::SpoonacularClient;

pub mod error;
pub mod handlers;
pub mod models;

pub use error::ApiError;

pub fn create_router(spoonacular: Arc<SpoonacularClient>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", read_only(handlers::root_handler))
        .route("/health", read_only(handlers::health_handler))
        // Public recipe routes, no caller auth
        .route("/recipes/search", read_only(handlers::search_handler))
        .route("/recipes/:recipe_id", read_only(handlers::recipe_handler))
        .fallback(handlers::not_found)
        .with_state(spoonacular)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// GET route whose other methods answer 405 with the JSON error envelope.
fn read_only<H, T>(handler: H) -> MethodRouter<Arc<SpoonacularClient>>
where
    H: Handler<T, Arc<SpoonacularClient>>,
    T: 'static,
{
    get(handler).fallback(handlers::method_not_allowed)
}

/// CORS policy for the configured origins. A `*` entry opens the API to any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("skipping invalid CORS origin {origin:?}: {e}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}

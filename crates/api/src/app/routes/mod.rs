use axum::Router;

pub mod import;
pub mod items;
pub mod system;

/// Router for all item endpoints.
pub fn router() -> Router {
    Router::new().nest("/items", items::router().merge(import::router()))
}

//! HTTP surface for the item list.
//!
//! | Method | Path          | Response             |
//! |--------|---------------|----------------------|
//! | GET    | `/items`      | 200, all items       |
//! | GET    | `/items/{id}` | 200, one item        |
//! | POST   | `/items`      | 201, created item    |
//! | PATCH  | `/items/{id}` | 200, updated item    |
//! | DELETE | `/items/{id}` | 500, not implemented |
//!
//! Failures are rendered by [`error::ApiError`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use item_core::MemoryStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_item, delete_item, get_item, list_items, method_not_allowed, route_not_found,
    update_item, SharedStore,
};

pub use item_core::Item;

/// Router over a fresh, empty in-memory store.
pub fn app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()))
}

pub fn app_with_store(store: SharedStore) -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serve `app()` on `listener` until the task is dropped.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

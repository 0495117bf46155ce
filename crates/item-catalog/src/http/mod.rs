//! # HTTP Surface
//!
//! An axum router over [`ItemService`].
//!
//! ## Routes
//!
//! - `GET /health_check` - liveness, `{"status": "ok"}`
//! - `GET /items` - list, optionally filtered with `ids`
//! - `GET /items/compare` - compare 2 to 5 items given by `ids`
//! - `GET|PUT|PATCH|DELETE /items/:item_id` - single item
//! - `POST /items` - create, `201 Created`
//!
//! Failures are JSON bodies of the form `{"detail": "..."}`.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::services::ItemService;
use axum::routing::get;
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// Build the application router.
pub fn router(service: ItemService) -> Router {
    Router::new()
        .route("/health_check", get(handlers::health_check))
        .route(
            "/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route("/items/compare", get(handlers::compare_items))
        .route(
            "/items/:item_id",
            get(handlers::get_item)
                .put(handlers::replace_item)
                .patch(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .with_state(service)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    service: ItemService,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Listening");
    }
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

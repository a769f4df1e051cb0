//! Route table and server loop.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/student/add", post(handlers::add_student))
        .route("/student/all", get(handlers::get_all_students))
        .route("/student/:id", get(handlers::get_student))
        .route("/add", post(handlers::add_lib_student))
        .route("/lib-student/:id", get(handlers::get_lib_student))
        .route("/library/:id", get(handlers::get_library))
        .route("/person/add", post(handlers::add_person))
        .route("/person/:id", get(handlers::get_person))
        .route("/owner/add", post(handlers::add_owner))
        .route("/owner/:id", get(handlers::get_owner))
        .route("/owner/:id/laptops", put(handlers::update_owner_laptops))
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        "event=http_listen module=http status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=http_shutdown module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=http_shutdown module=http status=error error={err}");
    }
}

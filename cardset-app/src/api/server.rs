use axum::{routing::get, Router};
use parking_lot::Mutex;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::routes::{
    create_group, delete_group, download_group, get_group, list_groups, share_group, AppState,
};
use crate::cli::commands::Store;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/flashcards", get(list_groups).post(create_group))
        .route("/flashcard/:id", get(get_group).delete(delete_group))
        .route("/flashcard/:id/download", get(download_group))
        .route("/flashcard/:id/share", get(share_group))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(store: Store, addr: SocketAddr, share_origin: String) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        store: Arc::new(Mutex::new(store)),
        share_origin,
    });

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "serving flashcards");
    eprintln!("listening on http://{addr}");
    axum::serve(listener, router(state).into_make_service()).await?;
    Ok(())
}

pub mod embed;
pub mod error;
pub mod page;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use dfg_core::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with the page, API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(config: Config) -> Router {
    let app_state = state::AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/",
            get(routes::selection::get_page).post(routes::selection::submit),
        )
        .route("/api/modules", get(routes::modules::list_modules))
        .route("/api/plan", post(routes::selection::preview_plan))
        .fallback(embed::static_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serve the selection page on a pre-bound listener.
///
/// The caller can read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(
    config: Config,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    tracing::info!(
        modules_root = %config.modules_root.display(),
        "dfg server listening on http://localhost:{actual_port}"
    );

    let app = build_router(config);

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        if let Err(e) = open::that(&url) {
            tracing::warn!("could not open browser: {e}");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}

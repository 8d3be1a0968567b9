use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use dfg_core::executor::{self, LogExecutor};
use dfg_core::plan::{self, Operation};
use dfg_core::selection;

use crate::error::AppError;
use crate::page;
use crate::state::AppState;

/// GET /: the module selection page.
pub async fn get_page(State(app): State<AppState>) -> Result<Html<String>, AppError> {
    let config = app.config.clone();
    let html = tokio::task::spawn_blocking(move || page::render_page(&config))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Html(html))
}

/// POST /: a submitted selection. The resolved operations run through the
/// executor before the page is served again.
pub async fn submit(State(app): State<AppState>, body: Bytes) -> Result<Html<String>, AppError> {
    let ops = resolve_body(&app, &body)?;

    let _running = app.run_lock.lock().await;
    let config = app.config.clone();
    let html = tokio::task::spawn_blocking(move || {
        let mut exec = LogExecutor::new();
        let ran = executor::run_plan(&ops, &mut exec)?;
        tracing::info!(operations = ran, "selection executed");
        page::render_page(&config)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Html(html))
}

/// POST /api/plan: resolve a submission body without running it.
pub async fn preview_plan(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let ops = resolve_body(&app, &body)?;
    Ok(Json(serde_json::json!({ "operations": ops })))
}

fn resolve_body(app: &AppState, body: &[u8]) -> Result<Vec<Operation>, AppError> {
    let table = selection::decode(body)?;
    let ops = plan::resolve(&table, &app.config.staging)?;
    Ok(ops)
}

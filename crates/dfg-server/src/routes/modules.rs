use axum::extract::State;
use axum::Json;
use dfg_core::scan::{self, DiscoverySequence};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/modules: the discovery sequence of the configured modules root.
pub async fn list_modules(
    State(app): State<AppState>,
) -> Result<Json<DiscoverySequence>, AppError> {
    let config = app.config.clone();
    let sequence = tokio::task::spawn_blocking(move || scan::scan(&config.modules_root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(sequence))
}

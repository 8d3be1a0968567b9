use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dfg_core::DfgError;

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<DfgError>() {
            Some(DfgError::Encoding(_) | DfgError::Validation(_)) => StatusCode::BAD_REQUEST,
            Some(DfgError::Structure(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(
                DfgError::NotInitialized(_)
                | DfgError::Filesystem { .. }
                | DfgError::Execution(_)
                | DfgError::Io(_)
                | DfgError::Yaml(_)
                | DfgError::Json(_),
            )
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:#}", self.0);
        } else {
            tracing::warn!("rejected request: {}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: DfgError) -> StatusCode {
        AppError(err.into()).into_response().status()
    }

    #[test]
    fn encoding_error_maps_to_400() {
        assert_eq!(
            status_of(DfgError::Encoding("no '='".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn validation_error_maps_to_400() {
        assert_eq!(
            status_of(DfgError::Validation("no stage".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn structure_error_maps_to_422() {
        assert_eq!(
            status_of(DfgError::Structure("_x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn filesystem_error_maps_to_500() {
        let err = DfgError::filesystem("/nope", std::io::Error::other("gone"));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_dfg_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_body_is_json() {
        let response = AppError(DfgError::Encoding("x".into()).into()).into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/"]
struct PageAssets;

/// Built-in asset as text (`start.html`, `end.html`).
pub fn text(name: &str) -> Option<String> {
    <PageAssets as Embed>::get(name).map(|f| String::from_utf8_lossy(&f.data).into_owned())
}

/// Serve embedded stylesheet and script assets.
pub async fn static_handler(uri: axum::http::Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match <PageAssets as Embed>::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_templates_are_embedded() {
        assert!(text("start.html").unwrap().contains("<form"));
        assert!(text("end.html").unwrap().contains("</form>"));
        assert!(text("missing.html").is_none());
    }
}

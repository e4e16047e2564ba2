//! Landing page

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::state::AppState;

/// Landing page listing the available endpoints
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub service: String,
    pub version: &'static str,
}

impl IntoResponse for IndexTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("Template rendering error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<!-- Template error -->".to_string()),
                )
                    .into_response()
            }
        }
    }
}

pub async fn home<R>(State(state): State<AppState<R>>) -> IndexTemplate {
    IndexTemplate {
        service: state.config().service.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_renders_service_name() {
        let page = IndexTemplate {
            service: "library-service".to_string(),
            version: "0.1.0",
        };
        let html = page.render().unwrap();
        assert!(html.contains("library-service"));
        assert!(html.contains("/books/search/"));
    }
}

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Turns any `anyhow` error bubbling out of a handler into a 500,
/// logging the full chain on the way out. Errors the operator should
/// see (validation failures) are rendered by the handlers themselves
/// and never reach this.
pub struct AppError(anyhow::Error);

pub type AppResult<T> = Result<T, AppError>;

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, "request handler failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>500</h1><p>Something went wrong on our side.</p>"),
        )
            .into_response()
    }
}

use crate::errors::ServerError;
use crate::responses::html::html_with_status;
use crate::responses::json::json_with_status;
use crate::templates::pages::error_page;
use astra::{Body, Response};
use serde_json::json;
use tracing::{error, warn};

/// Convert a ServerError into a proper HTML response.
pub fn error_to_response(err: ServerError) -> Response {
    log_error(&err);
    let status = err.status();
    html_with_status(status, error_page(status, &err)).unwrap_or_else(|_| fallback())
}

/// Same as [`error_to_response`] for the JSON endpoints.
pub fn json_error_response(err: ServerError) -> Response {
    log_error(&err);
    let status = err.status();
    let body = json!({
        "error": err.public_message(),
        "retryable": err.is_retryable(),
    });
    json_with_status(status, &body).unwrap_or_else(|_| fallback())
}

fn log_error(err: &ServerError) {
    match err.status() {
        s if s >= 500 => error!(error = %err, "Request failed"),
        _ => warn!(error = %err, "Request rejected"),
    }
}

fn fallback() -> Response {
    Response::new(Body::from("Internal Server Error".to_string()))
}

use astra::Response;
use thiserror::Error;

use crate::listings::ListingsError;

/// Errors originating from either the server logic
/// (routing, bad input) or the listings layer.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] ListingsError),

    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Upstream(ListingsError::NotFound(_)) => 404,
            ServerError::Upstream(e) if e.is_config() => 500,
            ServerError::Upstream(_) => 502,
            ServerError::InternalError => 500,
        }
    }

    /// What the visitor is told. Upstream details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::NotFound => "Not Found".to_string(),
            ServerError::BadRequest(msg) => msg.clone(),
            ServerError::Upstream(ListingsError::NotFound(mls)) => {
                format!("Listing {mls} is no longer available")
            }
            ServerError::Upstream(e) if e.is_auth() => {
                "The listings service rejected our credentials. Please try again later.".to_string()
            }
            ServerError::Upstream(e) if e.is_config() => "Internal Server Error".to_string(),
            ServerError::Upstream(_) => {
                "We could not reach the listings service. Please try again.".to_string()
            }
            ServerError::InternalError => "Internal Server Error".to_string(),
        }
    }

    /// Whether a "Try again" link makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServerError::Upstream(e) if !e.is_config() && !matches!(e, ListingsError::NotFound(_)))
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingsError {
    #[error("Listings API key is not configured (set api.api_key or APP_API__API_KEY)")]
    MissingCredential,

    #[error("Invalid listings API key header: {0}")]
    InvalidHeader(String),

    #[error("Invalid listings API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Authentication failed, check the API key (HTTP {status})")]
    Auth { status: u16 },

    #[error("Listings API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Could not decode listings response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Listing {0} not found")]
    NotFound(String),
}

impl ListingsError {
    /// Authentication failures are shown to the visitor as "try again".
    pub fn is_auth(&self) -> bool {
        matches!(self, ListingsError::Auth { .. })
    }

    /// Configuration problems are fatal; nothing the visitor does will help.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ListingsError::MissingCredential
                | ListingsError::InvalidHeader(_)
                | ListingsError::InvalidBaseUrl(_)
        )
    }
}

use thiserror::Error;

/// Errors raised while talking to the remote ledger.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("missing credential {0}")]
    MissingCredential(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ledger returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response from ledger: {0}")]
    Decode(String),

    /// The ledger understood the request and refused it.
    #[error("ledger rejected the request: {0}")]
    Rejected(String),
}


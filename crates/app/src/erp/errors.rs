//! ERP errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErpError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ERP returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("ERP call failed: {message}{}", format_detail(.detail))]
    Rpc {
        code: i64,
        message: String,
        detail: Option<String>,
    },

    #[error("unexpected response from ERP: {0}")]
    UnexpectedResponse(String),

    #[error("failed to decode ERP result")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode ERP payload")]
    Encode(#[source] serde_json::Error),

    #[error("{model} id {id} is not numeric")]
    NonNumericId { model: &'static str, id: String },

    #[error("authentication rejected for login {0}")]
    Authentication(String),

    #[error("{model} {id} not found")]
    NotFound { model: &'static str, id: String },
}

fn format_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(" ({detail})"))
        .unwrap_or_default()
}

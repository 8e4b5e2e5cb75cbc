use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("node responded with non-2xx status {status}: {body}")]
    RpcError { status: u16, body: String },

    #[error("network error reaching the node: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("failed to parse node response as JSON: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

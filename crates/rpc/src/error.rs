use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error talking to {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("endpoint {endpoint} rate-limited us")]
    RateLimited { endpoint: String },

    #[error("endpoint {endpoint} returned rpc error {code}: {message}")]
    RpcReturnedError {
        endpoint: String,
        code: i64,
        message: String,
    },

    #[error("malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed hex field in response from {endpoint}")]
    MalformedHex { endpoint: String },

    #[error("all endpoints exhausted for this call")]
    EndpointsExhausted,

    #[error("no rpc endpoints configured")]
    NoEndpoints,
}

impl RpcError {
    /// Whether this error should trigger an immediate endpoint rotation
    /// without spending a retry slot.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, RpcError::RateLimited { .. })
    }
}

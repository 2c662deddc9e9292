pub mod hugging_face;

use futures::future::LocalBoxFuture;
use serde_json::Value;
use thiserror::Error;

pub use hugging_face::HuggingFaceClient;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Could not reach the inference API: {0}")]
    Unreachable(String),
    #[error("HuggingFace API responded with status {0}")]
    UpstreamStatus(u16),
    #[error("Inference API returned an unreadable body: {0}")]
    Decode(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Outbound side of the proxy. Handlers only see this trait, so tests can
/// swap in a client that never touches the network.
pub trait InferenceClient: Send + Sync {
    /// Existence check against the model resource. No body is sent.
    fn check_connection(&self) -> LocalBoxFuture<'_, Result<(), InferenceError>>;

    /// Submits the image and returns the service's JSON answer untouched.
    fn classify<'a>(&'a self, image: &'a [u8]) -> LocalBoxFuture<'a, Result<Value, InferenceError>>;
}

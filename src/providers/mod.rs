//! Transport seam and the Gemini provider implementation

pub mod gemini;

use async_trait::async_trait;

// Re-export for convenience
pub use gemini::{GeminiTransport, ProviderPayload};

/// Raw provider answer: status code plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse
{   pub status: u16
  , pub body: String
}

/// Connection-level failure (refused, reset, timed out)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
      -> std::fmt::Result
    {   write!(f, "transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Performs one network call for a payload.
/// Retrying is the caller's business; implementors make exactly one attempt.
#[async_trait]
pub trait Transport: Send + Sync
{   async fn send(&self, payload: &ProviderPayload)
      -> Result<TransportResponse, TransportError>;
}

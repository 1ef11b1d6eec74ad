pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod retry;
pub mod orchestrator;
pub mod story;
pub mod history;
pub mod session;
pub mod client;

/*

storygen: async client that turns story parameters into a Gemini
generateContent call and hands back the story, or a message a
person can act on.

storygen/
├── src/
│   ├── lib.rs           # Re-exports and backend command types
│   ├── error.rs         # Setup errors, generation failures, friendly text
│   ├── config.rs        # Provider / retry / history configuration
│   ├── request.rs       # Story parameters and instruction text
│   ├── retry.rs         # Backoff policy and per-request retry state
│   ├── orchestrator.rs  # generate(): call, classify, retry
│   ├── providers/       # Transport seam + Gemini wire types
│   ├── story.rs         # Title / body / moral parser, reading stats
│   ├── history.rs       # JSON history store
│   ├── session.rs       # Collector -> generate -> presenter wiring
│   ├── client.rs        # Queued backend task
│   └── main.rs          # Terminal front end
└── tests/

*/

pub use config::StoryConfig;
pub use error::{Error, ErrorKind, GenerationError};
pub use orchestrator::RequestOrchestrator;
pub use request::{Emotion, GenerationRequest, StoryLength, StoryMode};
pub use retry::RetryPolicy;
pub use client::StoryBackend;

/// STORYGEN API INTERFACE:

/// Story text, or a classified failure with user-facing text
pub type GenerationResult = Result<String, crate::error::GenerationError>;

// ===== Generate =====

pub type GenerateReplySender
  = tokio::sync::mpsc::UnboundedSender<GenerationResult>;

pub struct GenerateArgs
{   pub request: GenerationRequest
  , pub reply: GenerateReplySender
}

// ===== Shutdown =====

pub type ShutdownReply = Result<(), crate::error::Error>;
pub type ShutdownReplySender
  = tokio::sync::mpsc::UnboundedSender<ShutdownReply>;

pub struct ShutdownArgs
{   pub reply: ShutdownReplySender
}

// ===== StoryHand (sender side) =====

pub struct StoryHand
{   pub generate_tx
      : tokio::sync::mpsc::UnboundedSender<GenerateArgs>
  , pub shutdown_tx
      : tokio::sync::mpsc::UnboundedSender<ShutdownArgs>
}

// ===== StoryFoot (receiver side) =====

pub struct StoryFoot
{   pub generate_rx
      : tokio::sync::mpsc::UnboundedReceiver<GenerateArgs>
  , pub shutdown_rx
      : tokio::sync::mpsc::UnboundedReceiver<ShutdownArgs>
}

/// Build an orchestrator talking to Gemini from configuration
pub fn gemini_orchestrator(
  config: &StoryConfig
) -> Result<RequestOrchestrator<providers::GeminiTransport>, crate::error::Error>
{   config.validate()?;
    let api_key = config.resolve_api_key()?;
    let transport = providers::GeminiTransport::new(
      &config.provider,
      api_key
    )?;
    Ok(RequestOrchestrator::new(
      transport,
      RetryPolicy::from(&config.retry)
    ))
}

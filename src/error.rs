use std::fmt;

/// Custom error type for storygen setup and collaborator operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// API key is missing from config and environment
    MissingApiKey(String)
  , /// Request parameters were rejected before sending
    InvalidRequest(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Filesystem error (config or history)
    Io(String)
  , /// Failed to parse JSON
    ParseError(String)
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(source) => {
              write!(f, "Missing API key: {}", source)
            }
          , Error::InvalidRequest(msg) => {
              write!(f, "Invalid request: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Io(msg) => {
              write!(f, "I/O error: {}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error
{   fn from(e: std::io::Error) -> Self
    {   Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::ParseError(e.to_string())
    }
}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

// ===== Generation failures =====

pub const NETWORK_FAILURE_MESSAGE: &str
  = "Network connection failed. Please check your internet connection and try again.";
pub const EMPTY_GENERATION_MESSAGE: &str
  = "No story was generated. Please try again with a different prompt.";
pub const EXHAUSTED_RETRIES_MESSAGE: &str
  = "Failed to generate story after multiple attempts. Please try again later.";

/// Terminal failure classification returned by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind
{   /// Connection could not be made or the attempt timed out
    Transport(String)
  , /// Provider answered with a non-success status
    Http
    {   status: u16
      , message: String
    }
  , /// Success status without generated text
    EmptyGeneration
  , /// Retry loop ended without a terminal answer
    ExhaustedRetries
    {   attempts: u32
    }
}

/// A classified failure plus the text shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError
{   pub kind: ErrorKind
  , pub message: String
}

impl GenerationError
{   pub fn transport(detail: impl Into<String>) -> Self
    {   GenerationError
        {   kind: ErrorKind::Transport(detail.into())
          , message: NETWORK_FAILURE_MESSAGE.to_string()
        }
    }

    pub fn http(status: u16, raw_message: impl Into<String>) -> Self
    {   let raw_message = raw_message.into();
        let message = friendly_message(status, &raw_message);
        GenerationError
        {   kind: ErrorKind::Http
            {   status
              , message: raw_message
            }
          , message
        }
    }

    pub fn empty_generation() -> Self
    {   GenerationError
        {   kind: ErrorKind::EmptyGeneration
          , message: EMPTY_GENERATION_MESSAGE.to_string()
        }
    }

    pub fn exhausted(attempts: u32) -> Self
    {   GenerationError
        {   kind: ErrorKind::ExhaustedRetries { attempts }
          , message: EXHAUSTED_RETRIES_MESSAGE.to_string()
        }
    }
}

impl fmt::Display for GenerationError
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   write!(f, "{}", self.message)
    }
}

impl std::error::Error for GenerationError {}

/// Map a provider status and raw error message to user-facing text.
/// First matching rule wins.
pub fn friendly_message(status: u16, raw_message: &str) -> String
{   let message = raw_message.to_lowercase();

    if message.contains("overloaded")
      || message.contains("rate limit")
      || status == 429
    {   return "The AI service is currently busy. \
                We'll automatically retry in a moment..."
          .to_string();
    }

    if message.contains("quota") || message.contains("billing")
    {   return "API quota exceeded. \
                Please check your Google AI billing settings."
          .to_string();
    }

    if message.contains("invalid") && message.contains("key")
    {   return "Invalid API key. \
                Please check your Google AI API key in the settings."
          .to_string();
    }

    if message.contains("permission") || status == 403
    {   return "Permission denied. \
                Please verify your API key has the correct permissions."
          .to_string();
    }

    if status == 400
    {   return "Invalid request. Please try a different story prompt."
          .to_string();
    }

    if status >= 500
    {   return "Google AI service is temporarily unavailable. \
                Please try again in a few minutes."
          .to_string();
    }

    format!(
      "Error: {}. Please try again or check your settings.",
      raw_message
    )
}

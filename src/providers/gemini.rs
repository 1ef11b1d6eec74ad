use async_trait::async_trait;
use log::{debug, error, trace};
use serde::{Deserialize, Serialize};

use super::{Transport, TransportError, TransportResponse};

// ===== Request Types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part
{   pub text: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content
{   pub parts: Vec<Part>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig
{   pub temperature: f32
  , pub top_k: u32
  , pub top_p: f32
  , pub max_output_tokens: u32
}

impl Default for GenerationConfig
{   fn default() -> Self
    {   GenerationConfig
        {   temperature: 0.9
          , top_k: 1
          , top_p: 1.0
          , max_output_tokens: 2048
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory
{   HarmCategoryHarassment
  , HarmCategoryHateSpeech
  , HarmCategorySexuallyExplicit
  , HarmCategoryDangerousContent
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmThreshold
{   BlockMediumAndAbove
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySetting
{   pub category: HarmCategory
  , pub threshold: HarmThreshold
}

/// Body of a generateContent call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderPayload
{   pub contents: Vec<Content>
  , pub generation_config: GenerationConfig
  , pub safety_settings: Vec<SafetySetting>
}

impl ProviderPayload
{   /// Wrap instruction text with the fixed sampling and safety blocks
    pub fn new(instruction: String) -> Self
    {   let safety_settings = [
          HarmCategory::HarmCategoryHarassment
        , HarmCategory::HarmCategoryHateSpeech
        , HarmCategory::HarmCategorySexuallyExplicit
        , HarmCategory::HarmCategoryDangerousContent
        ]
          .into_iter()
          .map(|category| SafetySetting
            {   category
              , threshold: HarmThreshold::BlockMediumAndAbove
            })
          .collect();

        ProviderPayload
        {   contents: vec![
              Content
              {   parts: vec![Part { text: instruction }]
              }
            ]
          , generation_config: GenerationConfig::default()
          , safety_settings
        }
    }

    pub fn from_request(req: &crate::request::GenerationRequest) -> Self
    {   ProviderPayload::new(crate::request::build_instruction(req))
    }

    /// The instruction text carried by this payload
    pub fn instruction(&self) -> &str
    {   self.contents.first()
          .and_then(|c| c.parts.first())
          .map(|p| p.text.as_str())
          .unwrap_or("")
    }
}

// ===== Response Types =====

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse
{   #[serde(default)]
    pub candidates: Option<Vec<Candidate>>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<CandidateContent>
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent
{   #[serde(default)]
    pub parts: Option<Vec<CandidatePart>>
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidatePart
{   #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope
{   error: Option<ErrorBody>
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody
{   message: Option<String>
}

/// Pull `candidates[0].content.parts[0].text` out of a success body.
/// Any missing link, bad JSON or blank text yields None.
pub fn extract_text(body: &str) -> Option<String>
{   let response: GenerateResponse = match serde_json::from_str(body)
    {   Ok(r) => r
      , Err(e) => {
          debug!("Success body is not a generate response: {}", e);
          return None;
        }
    };

    response.candidates?
      .into_iter()
      .next()?
      .content?
      .parts?
      .into_iter()
      .next()?
      .text
      .filter(|t| !t.trim().is_empty())
}

/// Best-effort `error.message` from a failure body,
/// falling back to `HTTP <status>`
pub fn extract_error_message(status: u16, body: &str) -> String
{   serde_json::from_str::<ErrorEnvelope>(body)
      .ok()
      .and_then(|e| e.error)
      .and_then(|e| e.message)
      .filter(|m| !m.trim().is_empty())
      .unwrap_or_else(|| format!("HTTP {}", status))
}

// ===== Gemini Transport =====

/// reqwest-backed transport for the generateContent endpoint
#[derive(Clone)]
pub struct GeminiTransport
{   http_client: reqwest::Client
  , endpoint: String
  , api_key: String
}

impl GeminiTransport
{   pub fn new(
      config: &crate::config::ProviderConfig
    , api_key: String
    ) -> Result<Self, crate::error::Error>
    {   debug!("Creating GeminiTransport for {}", config.model);
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout()
        {   builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          crate::error::Error::InvalidConfiguration(e.to_string())
        })?;

        Ok(GeminiTransport
        {   http_client
          , endpoint: format!(
              "{}/models/{}:generateContent",
              config.api_base.trim_end_matches('/'),
              config.model
            )
          , api_key
        })
    }

    pub fn endpoint(&self) -> &str
    {   &self.endpoint
    }
}

impl std::fmt::Debug for GeminiTransport
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
      -> std::fmt::Result
    {   f.debug_struct("GeminiTransport")
          .field("endpoint", &self.endpoint)
          .field("api_key", &crate::config::REDACTED)
          .finish()
    }
}

#[async_trait]
impl Transport for GeminiTransport
{   async fn send(&self, payload: &ProviderPayload)
      -> Result<TransportResponse, TransportError>
    {   trace!("Gemini request: {:?}", payload);

        let response = self.http_client
          .post(&self.endpoint)
          .query(&[("key", self.api_key.as_str())])
          .header("Content-Type", "application/json")
          .json(payload)
          .send()
          .await
          .map_err(|e| {
            // reqwest renders the URL, and the URL carries ?key=
            let e = e.without_url();
            error!("HTTP error: {}", e);
            TransportError(e.to_string())
          })?;

        let status = response.status().as_u16();
        trace!("Gemini response status: {}", status);

        let body = response.text().await.map_err(|e| {
          let e = e.without_url();
          error!("Failed to read response body: {}", e);
          TransportError(e.to_string())
        })?;

        Ok(TransportResponse { status, body })
    }
}

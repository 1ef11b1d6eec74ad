//! Request orchestration: payload, network call, classification, retry

use log::{debug, error, info, warn};

use crate::error::GenerationError;
use crate::providers::gemini::{extract_error_message, extract_text};
use crate::providers::{ProviderPayload, Transport};
use crate::request::GenerationRequest;
use crate::retry::{is_retryable, BackoffKind, RetryDecision, RetryPolicy, RetryState};
use crate::GenerationResult;

/// Turns a [`GenerationRequest`] into story text or a classified failure.
///
/// Holds only immutable configuration, so one orchestrator can serve
/// any number of concurrent `generate` calls.
#[derive(Debug)]
pub struct RequestOrchestrator<T>
{   transport: T
  , policy: RetryPolicy
}

impl<T: Transport> RequestOrchestrator<T>
{   pub fn new(transport: T, policy: RetryPolicy) -> Self
    {   RequestOrchestrator
        {   transport
          , policy
        }
    }

    pub fn policy(&self) -> &RetryPolicy
    {   &self.policy
    }

    pub fn transport(&self) -> &T
    {   &self.transport
    }

    /// Generate a story, retrying transient failures sequentially.
    /// Only terminal outcomes reach the caller.
    pub async fn generate(&self, req: &GenerationRequest) -> GenerationResult
    {   let payload = ProviderPayload::from_request(req);
        debug!(
          "Generating story: {} instruction chars",
          payload.instruction().len()
        );

        let mut state = RetryState::new(&self.policy);

        while state.in_budget()
        {   let response = match self.transport.send(&payload).await
            {   Ok(response) => response
              , Err(e) => {
                  match state.next(BackoffKind::Network)
                  {   RetryDecision::Wait(delay) => {
                        warn!(
                          "Network error, retrying in {:?} \
                           (attempt {}/{}): {}",
                          delay, state.attempt(),
                          self.policy.max_retries, e
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                      }
                    , RetryDecision::GiveUp => {
                        error!(
                          "Network error after {} calls: {}",
                          state.calls(), e
                        );
                        return Err(GenerationError::transport(e.0));
                      }
                    , RetryDecision::OutOfTime => break
                  }
                }
            };

            if !(200..300).contains(&response.status)
            {   let status = response.status;
                let message = extract_error_message(status, &response.body);

                if is_retryable(status, &message)
                {   match state.next(BackoffKind::Http)
                    {   RetryDecision::Wait(delay) => {
                          info!(
                            "API overloaded ({}), retrying in {:?} \
                             (attempt {}/{})",
                            status, delay, state.attempt(),
                            self.policy.max_retries
                          );
                          tokio::time::sleep(delay).await;
                          continue;
                        }
                      , RetryDecision::GiveUp => {}
                      , RetryDecision::OutOfTime => break
                    }
                }

                error!("Provider error {}: {}", status, message);
                return Err(GenerationError::http(status, message));
            }

            return match extract_text(&response.body)
            {   Some(text) => {
                  debug!(
                    "Story generated after {} calls ({} chars)",
                    state.calls(), text.len()
                  );
                  Ok(text)
                }
              , None => {
                  error!("Success response without generated text");
                  Err(GenerationError::empty_generation())
                }
            };
        }

        error!("Retry loop ended after {} retries", state.attempt());
        Err(GenerationError::exhausted(state.calls()))
    }
}

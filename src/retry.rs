//! Retry policy and per-request retry bookkeeping

use std::time::Duration;
use log::debug;
use tokio::time::Instant;

/// Which kind of failure is being retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffKind
{   /// Connection-level failure: fixed delay
    Network
  , /// Retryable provider status: exponential delay
    Http
}

/// Retry policy for failed requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy
{   pub max_retries: u32
  , pub initial_backoff: Duration
  , pub max_backoff: Duration
  , pub network_delay: Duration
  , pub max_elapsed: Option<Duration>
}

impl RetryPolicy
{   /// Create a new retry policy with no overall budget
    pub fn new(
      max_retries: u32
    , initial_backoff_ms: u64
    , max_backoff_ms: u64
    , network_delay_ms: u64
    ) -> Self
    {   RetryPolicy
        {   max_retries
          , initial_backoff: Duration::from_millis(initial_backoff_ms)
          , max_backoff: Duration::from_millis(max_backoff_ms)
          , network_delay: Duration::from_millis(network_delay_ms)
          , max_elapsed: None
        }
    }

    pub fn with_max_elapsed(mut self, budget: Duration) -> Self
    {   self.max_elapsed = Some(budget);
        self
    }

    /// Exponential backoff for retry number `attempt` (1-based),
    /// `min(initial * 2^attempt, max)`
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration
    {   let factor = 2u32.saturating_pow(attempt);
        let delay = self.initial_backoff
          .checked_mul(factor)
          .unwrap_or(self.max_backoff);
        let delay = delay.min(self.max_backoff);
        debug!("Backoff for attempt {}: {:?}", attempt, delay);
        delay
    }

    pub fn delay_for(&self, kind: BackoffKind, attempt: u32) -> Duration
    {   match kind
        {   BackoffKind::Network => self.network_delay
          , BackoffKind::Http => self.backoff_for_attempt(attempt)
        }
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::new(3, 1000, 10_000, 2000)
    }
}

impl From<&crate::config::RetryConfig> for RetryPolicy
{   fn from(config: &crate::config::RetryConfig) -> Self
    {   let policy = RetryPolicy::new(
          config.max_retries
        , config.initial_backoff_ms
        , config.max_backoff_ms
        , config.network_retry_delay_ms
        );
        match config.max_elapsed_ms
        {   Some(ms) => policy.with_max_elapsed(Duration::from_millis(ms))
          , None => policy
        }
    }
}

/// Outcome of asking the state for another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision
{   /// Sleep this long, then try again
    Wait(Duration)
  , /// No retries left: the current failure is terminal
    GiveUp
  , /// The overall budget cannot fit the next backoff
    OutOfTime
}

/// Per-request attempt counter; created per request, never shared
#[derive(Debug)]
pub struct RetryState<'a>
{   policy: &'a RetryPolicy
  , attempt: u32
  , started: Instant
}

impl<'a> RetryState<'a>
{   pub fn new(policy: &'a RetryPolicy) -> Self
    {   RetryState
        {   policy
          , attempt: 0
          , started: Instant::now()
        }
    }

    /// Retries performed so far
    pub fn attempt(&self) -> u32
    {   self.attempt
    }

    /// Network calls made once the current one returns
    pub fn calls(&self) -> u32
    {   self.attempt + 1
    }

    /// True while the loop may still issue a call
    pub fn in_budget(&self) -> bool
    {   self.attempt <= self.policy.max_retries
    }

    /// Consume one retry if any remain and the budget allows it
    pub fn next(&mut self, kind: BackoffKind) -> RetryDecision
    {   if self.attempt >= self.policy.max_retries
        {   return RetryDecision::GiveUp;
        }
        let delay = self.policy.delay_for(kind, self.attempt + 1);
        if let Some(budget) = self.policy.max_elapsed
        {   if self.started.elapsed() + delay > budget
            {   debug!(
                  "Backoff {:?} would exceed budget {:?}",
                  delay, budget
                );
                return RetryDecision::OutOfTime;
            }
        }
        self.attempt += 1;
        RetryDecision::Wait(delay)
    }
}

/// Whether a non-success response is worth retrying
pub fn is_retryable(status: u16, message: &str) -> bool
{   let message = message.to_lowercase();
    message.contains("overloaded")
      || message.contains("rate limit")
      || status == 429
      || status == 503
}

use storygen::error::{friendly_message, GenerationError, NETWORK_FAILURE_MESSAGE};
use storygen::retry::{is_retryable, BackoffKind, RetryDecision, RetryPolicy, RetryState};
use storygen::ErrorKind;
use std::time::Duration;

#[test]
fn test_friendly_message_rules()
{   let cases: [(u16, &str, &str); 9] = [
      (429, "whatever", "The AI service is currently busy.")
    , (500, "Model is OVERLOADED", "The AI service is currently busy.")
    , (400, "rate limit hit", "The AI service is currently busy.")
    , (400, "Quota exceeded for metric", "API quota exceeded.")
    , (403, "Billing account disabled", "API quota exceeded.")
    , (400, "API key not valid. Invalid key supplied", "Invalid API key.")
    , (401, "caller lacks PERMISSION", "Permission denied.")
    , (400, "Bad field", "Invalid request.")
    , (502, "Bad gateway", "Google AI service is temporarily unavailable.")
    ];

    for (status, raw, expected) in cases
    {   let msg = friendly_message(status, raw);
        assert!(
          msg.starts_with(expected),
          "{} {:?} -> {:?}",
          status, raw, msg
        );
    }
}

#[test]
fn test_forbidden_maps_to_permission()
{   assert!(friendly_message(403, "HTTP 403").starts_with("Permission denied."));
}

#[test]
fn test_fallback_embeds_raw_message()
{   assert_eq!(
      friendly_message(404, "Model not found"),
      "Error: Model not found. Please try again or check your settings."
    );
}

#[test]
fn test_generation_error_display_is_friendly_text()
{   let err = GenerationError::transport("dns failure");
    assert_eq!(err.to_string(), NETWORK_FAILURE_MESSAGE);
    assert_eq!(err.kind, ErrorKind::Transport("dns failure".to_string()));

    let err = GenerationError::http(400, "Bad field");
    assert_eq!(err.to_string(), "Invalid request. Please try a different story prompt.");
}

#[test]
fn test_retryable_classification()
{   assert!(is_retryable(429, ""));
    assert!(is_retryable(503, ""));
    assert!(is_retryable(500, "The model is overloaded"));
    assert!(is_retryable(400, "Rate limit exceeded"));
    assert!(!is_retryable(500, "Internal error"));
    assert!(!is_retryable(403, "HTTP 403"));
    assert!(!is_retryable(400, "quota exceeded"));
}

#[test]
fn test_backoff_formula()
{   let policy = RetryPolicy::default();
    let delays: Vec<u128> = (1..=5)
      .map(|n| policy.backoff_for_attempt(n).as_millis())
      .collect();
    assert_eq!(delays, vec![2000, 4000, 8000, 10_000, 10_000]);
    assert_eq!(policy.backoff_for_attempt(64), Duration::from_millis(10_000));
}

#[tokio::test(start_paused = true)]
async fn test_retry_state_never_exceeds_max()
{   let policy = RetryPolicy::default();
    let mut state = RetryState::new(&policy);
    let mut waits = Vec::new();
    loop
    {   match state.next(BackoffKind::Http)
        {   RetryDecision::Wait(d) => waits.push(d.as_millis())
          , RetryDecision::GiveUp => break
          , RetryDecision::OutOfTime => panic!("no budget configured")
        }
    }
    assert_eq!(waits, vec![2000, 4000, 8000]);
    assert_eq!(state.attempt(), 3);
    assert!(state.in_budget());
    assert_eq!(state.next(BackoffKind::Network), RetryDecision::GiveUp);
}

#[test]
fn test_policy_from_config()
{   let config = storygen::config::RetryConfig
    {   max_retries: 5
      , initial_backoff_ms: 500
      , max_backoff_ms: 3000
      , network_retry_delay_ms: 100
      , max_elapsed_ms: Some(20_000)
    };
    let policy = RetryPolicy::from(&config);
    assert_eq!(policy.max_retries, 5);
    assert_eq!(policy.backoff_for_attempt(1), Duration::from_millis(1000));
    assert_eq!(policy.backoff_for_attempt(3), Duration::from_millis(3000));
    assert_eq!(policy.delay_for(BackoffKind::Network, 2), Duration::from_millis(100));
    assert_eq!(policy.max_elapsed, Some(Duration::from_secs(20)));
}

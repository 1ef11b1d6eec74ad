#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use tokio::time::Instant;

use storygen::providers::{ProviderPayload, Transport, TransportError, TransportResponse};

pub type Step = Result<TransportResponse, TransportError>;

/// Transport that replays canned answers and records when it was called
pub struct ScriptedTransport
{   steps: Mutex<VecDeque<Step>>
  , repeat_last: Option<Step>
  , calls: Mutex<Vec<Instant>>
  , payloads: Mutex<Vec<ProviderPayload>>
}

impl ScriptedTransport
{   pub fn new(steps: Vec<Step>) -> Self
    {   ScriptedTransport
        {   steps: Mutex::new(steps.into())
          , repeat_last: None
          , calls: Mutex::new(Vec::new())
          , payloads: Mutex::new(Vec::new())
        }
    }

    /// Answer every call with the same step
    pub fn always(step: Step) -> Self
    {   ScriptedTransport
        {   steps: Mutex::new(VecDeque::new())
          , repeat_last: Some(step)
          , calls: Mutex::new(Vec::new())
          , payloads: Mutex::new(Vec::new())
        }
    }

    pub fn call_count(&self) -> usize
    {   self.calls.lock().unwrap().len()
    }

    /// Gaps between consecutive calls, in milliseconds
    pub fn gaps_ms(&self) -> Vec<u128>
    {   let calls = self.calls.lock().unwrap();
        calls.windows(2)
          .map(|w| (w[1] - w[0]).as_millis())
          .collect()
    }

    pub fn payloads(&self) -> Vec<ProviderPayload>
    {   self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport
{   async fn send(&self, payload: &ProviderPayload)
      -> Result<TransportResponse, TransportError>
    {   self.calls.lock().unwrap().push(Instant::now());
        self.payloads.lock().unwrap().push(payload.clone());
        let next = self.steps.lock().unwrap().pop_front();
        match next
        {   Some(step) => step
          , None => match &self.repeat_last
            {   Some(step) => step.clone()
              , None => Err(TransportError("script exhausted".to_string()))
            }
        }
    }
}

pub fn status(code: u16, body: &str) -> Step
{   Ok(TransportResponse
    {   status: code
      , body: body.to_string()
    })
}

pub fn story_body(text: &str) -> String
{   serde_json::json!({
      "candidates": [
        { "content": { "parts": [ { "text": text } ], "role": "model" } }
      ]
    }).to_string()
}

pub fn error_body(message: &str) -> String
{   serde_json::json!({
      "error": { "code": 0, "message": message, "status": "ERROR" }
    }).to_string()
}

pub fn refused() -> Step
{   Err(TransportError("connection refused".to_string()))
}

pub fn init_logging()
{   let _ = env_logger::builder().is_test(true).try_init();
}

pub const SAMPLE_STORY: &str = "\
**The Door Beneath the Stairs**

Mira found the key in a jar of buttons.

It was cold, heavier than it looked, and it hummed when she held it near the cellar.

🎯 MORAL OF THE STORY:
Curiosity opens doors that fear keeps shut.";

/// Dispatches each call to the script whose needle appears in the instruction
pub struct RoutedTransport
{   routes: Vec<(&'static str, ScriptedTransport)>
}

impl RoutedTransport
{   pub fn new(routes: Vec<(&'static str, ScriptedTransport)>) -> Self
    {   RoutedTransport { routes }
    }
}

#[async_trait]
impl Transport for RoutedTransport
{   async fn send(&self, payload: &ProviderPayload)
      -> Result<TransportResponse, TransportError>
    {   for (needle, script) in &self.routes
        {   if payload.instruction().contains(needle)
            {   return script.send(payload).await;
            }
        }
        Err(TransportError("no route".to_string()))
    }
}

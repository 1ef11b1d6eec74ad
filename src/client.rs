use std::sync::Arc;
use tokio::sync::mpsc;
use log::{debug, error, info};

use crate::orchestrator::RequestOrchestrator;
use crate::providers::Transport;
use crate::request::GenerationRequest;
use crate::StoryFoot;

/// Public queued API over an orchestrator - owns the task
pub struct StoryBackend
{   hand: crate::StoryHand
  , _task_handle: tokio::task::JoinHandle<()>
}

impl StoryBackend
{   /// Create and spawn a new backend
    /// Returns immediately - spawns background task
    pub fn new<T>(orchestrator: RequestOrchestrator<T>) -> Self
    where
      T: Transport + 'static
    {   debug!("Creating StoryBackend with task ownership");

        let (generate_tx, generate_rx)
          = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx)
          = mpsc::unbounded_channel();

        let hand = crate::StoryHand
        {   generate_tx
          , shutdown_tx
        };

        let foot = crate::StoryFoot
        {   generate_rx
          , shutdown_rx
        };

        let orchestrator = Arc::new(orchestrator);
        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, orchestrator).await
        });

        StoryBackend
        {   hand
          , _task_handle
        }
    }

    /// Queue a generation - returns almost immediately
    pub async fn generate(
      &self
    , request: GenerationRequest
    ) -> Result<
        mpsc::UnboundedReceiver<crate::GenerationResult>,
        crate::error::Error
      >
    {   debug!("generate queuing command");
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::GenerateArgs
        {   request
          , reply: reply_tx
        };

        self.hand.generate_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// Gracefully shutdown the backend
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down StoryBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::ShutdownArgs
        {   reply: reply_tx
        };

        self.hand.shutdown_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::Other(
              "Backend already shutdown".to_string()
            )
          })?;

        // Wait for shutdown confirmation
        match reply_rx.recv().await
        {   Some(result) => {
              debug!("Backend shutdown confirmed");
              result
            }
          , None => {
              error!("Backend loop ended without confirming shutdown");
              Err(crate::error::Error::Other(
                "Backend shutdown unconfirmed".to_string()
              ))
            }
        }
    }
}

/// Main backend event loop
///
/// tokio::select! only routes commands. Each generation runs in its
/// own task so independent requests never wait on each other.
async fn run_backend_loop<T>(
  foot: StoryFoot
, orchestrator: Arc<RequestOrchestrator<T>>
)
where
  T: Transport + 'static
{   debug!("Starting StoryBackend event loop");
    let StoryFoot
    {   mut generate_rx
      , mut shutdown_rx
    } = foot;

    loop
    { tokio::select!
      { Some(cmd) = generate_rx.recv() => {
          debug!("Received Generate");
          let orchestrator = Arc::clone(&orchestrator);
          tokio::spawn(async move {
            let result = orchestrator.generate(&cmd.request).await;
            let _ = cmd.reply.send(result);
          });
        }
      , Some(cmd) = shutdown_rx.recv() => {
          debug!("Received Shutdown");
          let _ = cmd.reply.send(Ok(()));
          info!("StoryBackend shutting down");
          break;
        }
      , else => {
          debug!("All command channels closed");
          break;
        }
      }
    }
}

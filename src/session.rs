//! Collaborator seams and the session that wires them around generation

use log::{debug, warn};

use crate::history::{HistoryEntry, HistoryStore};
use crate::orchestrator::RequestOrchestrator;
use crate::providers::Transport;
use crate::request::GenerationRequest;
use crate::GenerationResult;

/// Gathers the parameters for the next story
pub trait ParameterCollector
{   fn collect(&mut self)
      -> Result<GenerationRequest, crate::error::Error>;
}

/// Renders progress and outcomes to some view
pub trait Presenter
{   fn show_loading(&mut self, loading: bool);

    fn show_result(&mut self, result: &GenerationResult);
}

/// One collector-to-presenter pass per `run`
pub struct StorySession<T, P, H>
{   orchestrator: RequestOrchestrator<T>
  , presenter: P
  , history: H
}

impl<T, P, H> StorySession<T, P, H>
where
  T: Transport
, P: Presenter
, H: HistoryStore
{   pub fn new(
      orchestrator: RequestOrchestrator<T>
    , presenter: P
    , history: H
    ) -> Self
    {   StorySession
        {   orchestrator
          , presenter
          , history
        }
    }

    /// Collect, generate, record and present one story.
    /// Only a collection failure is returned as `Err`.
    pub async fn run(
      &mut self
    , collector: &mut impl ParameterCollector
    ) -> Result<GenerationResult, crate::error::Error>
    {   let request = collector.collect()?;
        debug!("Session collected request: {:?}", request);

        self.presenter.show_loading(true);
        let result = self.orchestrator.generate(&request).await;
        self.presenter.show_loading(false);

        if let Ok(story) = &result
        {   let entry = HistoryEntry::new(request, story.clone());
            if let Err(e) = self.history.append(entry)
            {   warn!("Failed to save history: {}", e);
            }
        }

        self.presenter.show_result(&result);
        Ok(result)
    }

    pub fn presenter(&self) -> &P
    {   &self.presenter
    }

    pub fn history(&self) -> &H
    {   &self.history
    }
}

//! Best-effort history of past generations

use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::request::GenerationRequest;

/// One successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry
{   /// Creation time in milliseconds since the epoch
    pub id: i64
  , pub request: GenerationRequest
  , pub story: String
  , pub timestamp: DateTime<Utc>
}

impl HistoryEntry
{   pub fn new(request: GenerationRequest, story: String) -> Self
    {   let timestamp = Utc::now();
        HistoryEntry
        {   id: timestamp.timestamp_millis()
          , request
          , story
          , timestamp
        }
    }
}

/// Durable log of past generations, newest first
pub trait HistoryStore
{   fn append(&mut self, entry: HistoryEntry)
      -> Result<(), crate::error::Error>;

    fn entries(&self) -> &[HistoryEntry];
}

impl<H: HistoryStore + ?Sized> HistoryStore for Box<H>
{   fn append(&mut self, entry: HistoryEntry)
      -> Result<(), crate::error::Error>
    {   (**self).append(entry)
    }

    fn entries(&self) -> &[HistoryEntry]
    {   (**self).entries()
    }
}

/// Store used when no history path is configured; keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl HistoryStore for NoHistory
{   fn append(&mut self, entry: HistoryEntry)
      -> Result<(), crate::error::Error>
    {   debug!("History disabled, dropping entry {}", entry.id);
        Ok(())
    }

    fn entries(&self) -> &[HistoryEntry]
    {   &[]
    }
}

/// History kept as a JSON array in a single file
#[derive(Debug)]
pub struct JsonHistoryStore
{   path: PathBuf
  , limit: usize
  , entries: Vec<HistoryEntry>
}

impl JsonHistoryStore
{   /// Open the store; a missing or unreadable file starts empty
    pub fn open(path: impl AsRef<Path>, limit: usize) -> Self
    {   let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path)
        {   Ok(raw) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw)
            {   Ok(mut entries) => {
                  entries.truncate(limit);
                  entries
                }
              , Err(e) => {
                  warn!(
                    "Ignoring corrupt history {}: {}",
                    path.display(), e
                  );
                  Vec::new()
                }
            }
          , Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
              Vec::new()
            }
          , Err(e) => {
              warn!("Cannot read history {}: {}", path.display(), e);
              Vec::new()
            }
        };
        debug!(
          "Loaded {} history entries from {}",
          entries.len(), path.display()
        );
        JsonHistoryStore
        {   path
          , limit
          , entries
        }
    }

    pub fn path(&self) -> &Path
    {   &self.path
    }

    fn persist(&self) -> Result<(), crate::error::Error>
    {   if let Some(parent) = self.path.parent()
        {   if !parent.as_os_str().is_empty()
            {   std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore
{   fn append(&mut self, entry: HistoryEntry)
      -> Result<(), crate::error::Error>
    {   self.entries.insert(0, entry);
        self.entries.truncate(self.limit);
        self.persist()
    }

    fn entries(&self) -> &[HistoryEntry]
    {   &self.entries
    }
}

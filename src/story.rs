//! Structured view of generated story text

use std::path::Path;
use log::debug;
use serde::{Deserialize, Serialize};

const WORDS_PER_MINUTE: usize = 200;
const MORAL_MARKERS: [&str; 2] = ["MORAL OF THE STORY", "🎯"];
const ECHOED_LABELS: [&str; 3] = ["📖", "👤", "🎭"];

/// Title, body and moral split out of provider output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStory
{   pub title: Option<String>
  , pub paragraphs: Vec<String>
  , pub moral: Option<String>
}

impl ParsedStory
{   /// Plain text rendering: title, paragraphs, moral
    pub fn plain_text(&self) -> String
    {   let mut blocks: Vec<String> = Vec::new();
        if let Some(title) = &self.title
        {   blocks.push(title.clone());
        }
        blocks.extend(self.paragraphs.iter().cloned());
        if let Some(moral) = &self.moral
        {   blocks.push(format!("Moral: {}", moral));
        }
        blocks.join("\n\n")
    }

    /// Save the plain text rendering, replacing any existing file
    pub fn write_plain_text(&self, path: impl AsRef<Path>)
      -> Result<(), crate::error::Error>
    {   let path = path.as_ref();
        debug!("Writing story to {}", path.display());
        std::fs::write(path, self.plain_text() + "\n")?;
        Ok(())
    }
}

/// Split provider output into title, paragraphs and moral.
///
/// The first line is the title unless it looks like an echoed label.
/// Everything after a moral marker line belongs to the moral.
pub fn parse_story(text: &str) -> ParsedStory
{   let mut story = ParsedStory::default();
    let mut moral_parts: Vec<String> = Vec::new();
    let mut in_moral = false;

    let lines = text.lines()
      .map(str::trim)
      .filter(|l| !l.is_empty());

    for (i, line) in lines.enumerate()
    {   if MORAL_MARKERS.iter().any(|m| line.contains(m))
        {   in_moral = true;
            // "🎯 MORAL OF THE STORY: Be kind." keeps the inline part
            if let Some((_, rest)) = line.split_once(':')
            {   let rest = strip_decoration(rest);
                if !rest.is_empty()
                {   moral_parts.push(rest);
                }
            }
            continue;
        }

        if in_moral
        {   moral_parts.push(line.to_string());
        } else if i == 0 && !line.contains("📖") && !line.contains("STORY")
        {   let title = strip_decoration(line);
            if !title.is_empty()
            {   story.title = Some(title);
            }
        } else if !ECHOED_LABELS.iter().any(|l| line.contains(l))
        {   story.paragraphs.push(line.to_string());
        }
    }

    if !moral_parts.is_empty()
    {   story.moral = Some(moral_parts.join(" "));
    }
    story
}

/// Drop markdown heading hashes, bold stars and placeholder brackets
fn strip_decoration(line: &str) -> String
{   let line = line.trim().trim_start_matches('#').trim();
    let line = line
      .strip_prefix("**")
      .and_then(|l| l.strip_suffix("**"))
      .unwrap_or(line)
      .trim();
    let line = line
      .strip_prefix('[')
      .and_then(|l| l.strip_suffix(']'))
      .unwrap_or(line);
    line.trim().to_string()
}

/// Word count and estimated reading time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingStats
{   pub word_count: usize
  , pub minutes: usize
}

impl ReadingStats
{   pub fn of(text: &str) -> Self
    {   let word_count = text.split_whitespace().count();
        ReadingStats
        {   word_count
          , minutes: word_count.div_ceil(WORDS_PER_MINUTE)
        }
    }
}

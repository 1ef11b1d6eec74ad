//! Story parameters and the instruction text built from them

use serde::{Deserialize, Serialize};

/// Narrative style requested for the story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryMode
{   Classic
  , Thriller
  , Rpg
  , Mystery
  , RoleSwap
  , Interactive
}

impl StoryMode
{   pub const ALL: [StoryMode; 6] = [
      StoryMode::Classic
    , StoryMode::Thriller
    , StoryMode::Rpg
    , StoryMode::Mystery
    , StoryMode::RoleSwap
    , StoryMode::Interactive
    ];

    /// Parse a UI key; unknown keys yield None
    pub fn from_key(key: &str) -> Option<Self>
    {   match key.trim().to_lowercase().as_str()
        {   "classic" => Some(StoryMode::Classic)
          , "thriller" => Some(StoryMode::Thriller)
          , "rpg" => Some(StoryMode::Rpg)
          , "mystery" => Some(StoryMode::Mystery)
          , "roleswap" => Some(StoryMode::RoleSwap)
          , "interactive" => Some(StoryMode::Interactive)
          , _ => None
        }
    }

    pub fn key(&self) -> &'static str
    {   match self
        {   StoryMode::Classic => "classic"
          , StoryMode::Thriller => "thriller"
          , StoryMode::Rpg => "rpg"
          , StoryMode::Mystery => "mystery"
          , StoryMode::RoleSwap => "roleswap"
          , StoryMode::Interactive => "interactive"
        }
    }

    pub fn instruction(&self) -> &'static str
    {   match self
        {   StoryMode::Classic =>
              "Write a traditional narrative story with clear beginning, \
               middle, and end."
          , StoryMode::Thriller =>
              "Create a suspenseful thriller with plot twists, tension, and \
               unexpected revelations. Include cliffhangers and mysterious \
               elements."
          , StoryMode::Rpg =>
              "Write an RPG-style adventure with character development, \
               quests, magical elements, and world-building. Include stats, \
               abilities, or game-like elements."
          , StoryMode::Mystery =>
              "Create a mystery story with clues, red herrings, and a puzzle \
               to solve. Include investigative elements and logical \
               deduction."
          , StoryMode::RoleSwap =>
              "Write a story where characters swap roles, perspectives, or \
               identities. Explore how this change affects the narrative."
          , StoryMode::Interactive =>
              "Create an interactive world-building story with rich \
               descriptions of the environment, cultures, and societies. \
               Make the world feel alive and immersive."
        }
    }
}

/// Emotional core driving the plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion
{   Hope
  , Fear
  , Love
  , Betrayal
  , Discovery
  , Revenge
}

impl Emotion
{   /// Parse a UI key; unknown keys yield None
    pub fn from_key(key: &str) -> Option<Self>
    {   match key.trim().to_lowercase().as_str()
        {   "hope" => Some(Emotion::Hope)
          , "fear" => Some(Emotion::Fear)
          , "love" => Some(Emotion::Love)
          , "betrayal" => Some(Emotion::Betrayal)
          , "discovery" => Some(Emotion::Discovery)
          , "revenge" => Some(Emotion::Revenge)
          , _ => None
        }
    }

    pub fn instruction(&self) -> &'static str
    {   match self
        {   Emotion::Hope =>
              "Center the story around themes of hope, optimism, and \
               overcoming adversity. Show characters finding light in \
               darkness."
          , Emotion::Fear =>
              "Build a story around fear, anxiety, and suspense. Create \
               tension and explore what frightens the characters."
          , Emotion::Love =>
              "Focus on love, relationships, and emotional connections. \
               Explore different types of love (romantic, familial, \
               friendship)."
          , Emotion::Betrayal =>
              "Create a story involving betrayal, broken trust, and its \
               consequences. Show the impact on relationships."
          , Emotion::Discovery =>
              "Build the plot around discovery, revelation, and uncovering \
               hidden truths. Include moments of realization."
          , Emotion::Revenge =>
              "Center the story on revenge, justice, and the consequences \
               of seeking vengeance."
        }
    }
}

/// Target length class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryLength
{   Short
  , #[default]
    Medium
  , Long
}

impl StoryLength
{   /// Parse a UI key; unknown keys fall back to Medium
    pub fn from_key(key: &str) -> Self
    {   match key.trim().to_lowercase().as_str()
        {   "short" => StoryLength::Short
          , "long" => StoryLength::Long
          , _ => StoryLength::Medium
        }
    }

    pub fn word_range(&self) -> &'static str
    {   match self
        {   StoryLength::Short => "100-200 words"
          , StoryLength::Medium => "300-500 words"
          , StoryLength::Long => "600-800 words"
        }
    }
}

/// Immutable set of story parameters.
///
/// Built with [`GenerationRequest::new`] and the consuming `with_*`
/// methods; the prompt is guaranteed non-blank, deserialization included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GenerationRequestRecord")]
pub struct GenerationRequest
{   prompt: String
  , character: Option<String>
  , mode: Option<StoryMode>
  , tone: String
  , emotion: Option<Emotion>
  , length: StoryLength
}

impl GenerationRequest
{   pub fn new(prompt: impl Into<String>)
      -> Result<Self, crate::error::Error>
    {   let prompt = prompt.into().trim().to_string();
        if prompt.is_empty()
        {   return Err(crate::error::Error::InvalidRequest(
              "Please enter a story prompt".to_string()
            ));
        }
        Ok(GenerationRequest
        {   prompt
          , character: None
          , mode: None
          , tone: String::new()
          , emotion: None
          , length: StoryLength::default()
        })
    }

    pub fn with_character(mut self, name: impl Into<String>) -> Self
    {   let name = name.into().trim().to_string();
        self.character = if name.is_empty() { None } else { Some(name) };
        self
    }

    pub fn with_mode(mut self, mode: Option<StoryMode>) -> Self
    {   self.mode = mode;
        self
    }

    pub fn with_mode_key(self, key: &str) -> Self
    {   self.with_mode(StoryMode::from_key(key))
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self
    {   self.tone = tone.into().trim().to_string();
        self
    }

    pub fn with_emotion(mut self, emotion: Option<Emotion>) -> Self
    {   self.emotion = emotion;
        self
    }

    pub fn with_emotion_key(self, key: &str) -> Self
    {   self.with_emotion(Emotion::from_key(key))
    }

    pub fn with_length(mut self, length: StoryLength) -> Self
    {   self.length = length;
        self
    }

    pub fn with_length_key(self, key: &str) -> Self
    {   self.with_length(StoryLength::from_key(key))
    }

    pub fn prompt(&self) -> &str { &self.prompt }
    pub fn character(&self) -> Option<&str> { self.character.as_deref() }
    pub fn mode(&self) -> Option<StoryMode> { self.mode }
    pub fn tone(&self) -> &str { &self.tone }
    pub fn emotion(&self) -> Option<Emotion> { self.emotion }
    pub fn length(&self) -> StoryLength { self.length }
}

/// Unchecked serialized form, validated through the builder
#[derive(Deserialize)]
struct GenerationRequestRecord
{   prompt: String
  , #[serde(default)]
    character: Option<String>
  , #[serde(default)]
    mode: Option<StoryMode>
  , #[serde(default)]
    tone: String
  , #[serde(default)]
    emotion: Option<Emotion>
  , #[serde(default)]
    length: StoryLength
}

impl TryFrom<GenerationRequestRecord> for GenerationRequest
{   type Error = crate::error::Error;

    fn try_from(record: GenerationRequestRecord) -> Result<Self, Self::Error>
    {   let mut request = GenerationRequest::new(record.prompt)?
          .with_mode(record.mode)
          .with_tone(record.tone)
          .with_emotion(record.emotion)
          .with_length(record.length);
        if let Some(character) = record.character
        {   request = request.with_character(character);
        }
        Ok(request)
    }
}

const INSTRUCTION_HEADER: &str
  = "Create an advanced, engaging story with the following specifications:";

const FORMAT_REQUIREMENTS: &str = "\
✨ SPECIAL REQUIREMENTS:
- Write a complete, well-structured story with clear beginning, middle, and end
- Include engaging dialogue where appropriate
- Format with proper paragraphs
- End with a clear MORAL OF THE STORY section
- Make the story creative, unique, and emotionally engaging
- If mystery/thriller mode: include clues and revelations
- If RPG mode: include adventure elements and character growth
- Ensure the main character (if provided) is central to the plot

📝 FORMAT YOUR RESPONSE AS:
[STORY TITLE]

[MAIN STORY CONTENT]

🎯 MORAL OF THE STORY:
[Clear moral or lesson learned from the story]";

/// Render the instruction text sent to the provider.
/// Pure: the same request always yields the same string.
pub fn build_instruction(req: &GenerationRequest) -> String
{   let mut text = format!(
      "{}\n\n📖 STORY PROMPT: {}",
      INSTRUCTION_HEADER,
      req.prompt()
    );

    if let Some(character) = req.character()
    {   text.push_str(&format!("\n👤 MAIN CHARACTER: {}", character));
    }

    if let Some(mode) = req.mode()
    {   text.push_str(&format!("\n🎮 STORY MODE: {}", mode.instruction()));
    }

    if !req.tone().is_empty()
    {   text.push_str(&format!("\n🎨 TONE/STYLE: {}", req.tone()));
    }

    if let Some(emotion) = req.emotion()
    {   text.push_str(&format!(
          "\n💭 EMOTIONAL CORE: {}",
          emotion.instruction()
        ));
    }

    text.push_str(&format!("\n📏 LENGTH: {}", req.length().word_range()));
    text.push_str("\n\n");
    text.push_str(FORMAT_REQUIREMENTS);
    text
}

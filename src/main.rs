use std::path::PathBuf;
use clap::Parser;
use log::{debug, error, info, warn};
use rand::Rng;

use storygen::history::{HistoryStore, JsonHistoryStore, NoHistory};
use storygen::session::{ParameterCollector, Presenter, StorySession};
use storygen::story::{parse_story, ReadingStats};
use storygen::{GenerationRequest, GenerationResult, StoryConfig};

const EXAMPLE_PROMPTS: [&str; 10] = [
  "A time traveler accidentally changes a small detail in the past and returns to find the world completely different."
, "A librarian discovers that the books in their library come to life after midnight."
, "Two rival coffee shop owners are forced to work together when their shops are the only ones left on a street being demolished."
, "A detective who can see the last 24 hours of a deceased person's life by touching objects they owned."
, "A world where people's emotions are visible as colored auras around them."
, "A young artist finds a paintbrush that makes whatever they paint become real."
, "The last human on Earth receives a message from space."
, "A chef discovers their food can heal people's emotional wounds."
, "A small town where everyone's dreams are connected."
, "A person who can communicate with plants discovers they have urgent news about the future."
];

/// Generate a short story with Gemini
#[derive(Debug, Parser)]
#[command(name = "storygen", version)]
struct Cli
{   /// Story prompt
    prompt: Option<String>
  , /// Use a random example prompt instead
    #[arg(long)]
    example: bool
  , /// Main character name
    #[arg(long)]
    character: Option<String>
  , /// classic, thriller, rpg, mystery, roleswap or interactive
    #[arg(long)]
    mode: Option<String>
  , /// Free-form tone or style
    #[arg(long)]
    tone: Option<String>
  , /// hope, fear, love, betrayal, discovery or revenge
    #[arg(long)]
    emotion: Option<String>
  , /// short, medium or long
    #[arg(long, default_value = "medium")]
    length: String
  , /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>
  , /// JSON history file (overrides config); no history when unset
    #[arg(long)]
    history: Option<PathBuf>
  , /// Also save the story as plain text to this file
    #[arg(long, short)]
    output: Option<PathBuf>
}

impl ParameterCollector for Cli
{   fn collect(&mut self)
      -> Result<GenerationRequest, storygen::Error>
    {   let prompt = if self.example
        {   let i = rand::rng().random_range(0..EXAMPLE_PROMPTS.len());
            EXAMPLE_PROMPTS[i].to_string()
        } else
        {   self.prompt.clone().unwrap_or_default()
        };

        let mut request = GenerationRequest::new(prompt)?
          .with_length_key(&self.length);
        if let Some(character) = &self.character
        {   request = request.with_character(character.as_str());
        }
        if let Some(mode) = &self.mode
        {   request = request.with_mode_key(mode);
        }
        if let Some(tone) = &self.tone
        {   request = request.with_tone(tone.as_str());
        }
        if let Some(emotion) = &self.emotion
        {   request = request.with_emotion_key(emotion);
        }
        Ok(request)
    }
}

/// Writes stories to stdout and failures to stderr
struct TerminalPresenter
{   output: Option<PathBuf>
}

impl Presenter for TerminalPresenter
{   fn show_loading(&mut self, loading: bool)
    {   if loading
        {   eprintln!("Generating story...");
        }
    }

    fn show_result(&mut self, result: &GenerationResult)
    {   match result
        {   Ok(text) => {
              let story = parse_story(text);
              let stats = ReadingStats::of(&story.plain_text());
              println!("{}\n", story.plain_text());
              println!(
                "Est. reading time: {} min ({} words)",
                stats.minutes, stats.word_count
              );
              if let Some(path) = &self.output
              {   match story.write_plain_text(path)
                  {   Ok(()) => info!("Story saved to {}", path.display())
                    , Err(e) => {
                        warn!("Failed to save story: {}", e);
                        eprintln!("Could not save story to {}: {}", path.display(), e);
                      }
                  }
              }
            }
          , Err(e) => {
              eprintln!("Error generating story: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main()
{   env_logger::init();
    let mut cli = Cli::parse();

    let code = match run(&mut cli).await
    {   Ok(true) => 0
      , Ok(false) => 1
      , Err(e) => {
          error!("{}", e);
          eprintln!("{}", e);
          2
        }
    };
    std::process::exit(code);
}

async fn run(cli: &mut Cli) -> Result<bool, storygen::Error>
{   let config = match &cli.config
    {   Some(path) => StoryConfig::from_file(path)?
      , None => StoryConfig::default()
    };
    debug!("Effective config: {:?}", config);

    let history: Box<dyn HistoryStore> = match cli.history.clone()
      .or_else(|| config.history.path.clone())
    {   Some(path) => Box::new(JsonHistoryStore::open(path, config.history.limit))
      , None => {
          debug!("No history path configured, history disabled");
          Box::new(NoHistory)
        }
    };

    let orchestrator = storygen::gemini_orchestrator(&config)?;
    let mut session = StorySession::new(
      orchestrator,
      TerminalPresenter { output: cli.output.clone() },
      history
    );

    let result = session.run(cli).await?;
    Ok(result.is_ok())
}

use tokio_test::assert_err;

use storygen::providers::ProviderPayload;
use storygen::request::build_instruction;
use storygen::{Emotion, Error, GenerationRequest, StoryLength, StoryMode};

#[test]
fn test_mystery_short_scenario()
{   let req = GenerationRequest::new("A lost key opens a door")
      .unwrap()
      .with_mode_key("mystery")
      .with_length_key("short");
    let text = build_instruction(&req);

    assert!(text.contains("📖 STORY PROMPT: A lost key opens a door"));
    assert!(text.contains(StoryMode::Mystery.instruction()));
    assert!(text.contains("🎮 STORY MODE: Create a mystery story with clues"));
    assert!(text.contains("📏 LENGTH: 100-200 words"));
    assert!(!text.contains("MAIN CHARACTER"));
    assert!(!text.contains("TONE/STYLE"));
    assert!(!text.contains("EMOTIONAL CORE"));
}

#[test]
fn test_sections_appear_in_fixed_order()
{   let req = GenerationRequest::new("Dragons learn to bake")
      .unwrap()
      .with_character("Ember")
      .with_mode(Some(StoryMode::Rpg))
      .with_tone("whimsical")
      .with_emotion(Some(Emotion::Hope))
      .with_length(StoryLength::Long);
    let text = build_instruction(&req);

    let order = [
      "📖 STORY PROMPT: Dragons learn to bake"
    , "👤 MAIN CHARACTER: Ember"
    , "🎮 STORY MODE: Write an RPG-style adventure"
    , "🎨 TONE/STYLE: whimsical"
    , "💭 EMOTIONAL CORE: Center the story around themes of hope"
    , "📏 LENGTH: 600-800 words"
    , "✨ SPECIAL REQUIREMENTS:"
    , "🎯 MORAL OF THE STORY:"
    ];
    let positions: Vec<usize> = order.iter()
      .map(|s| text.find(s).unwrap_or_else(|| panic!("missing {}", s)))
      .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_instruction_is_deterministic()
{   let make = || GenerationRequest::new("Same input")
      .unwrap()
      .with_character("Ada")
      .with_tone("dark")
      .with_emotion_key("betrayal");

    assert_eq!(build_instruction(&make()), build_instruction(&make()));
    assert_eq!(
      serde_json::to_vec(&ProviderPayload::from_request(&make())).unwrap(),
      serde_json::to_vec(&ProviderPayload::from_request(&make())).unwrap()
    );
}

#[test]
fn test_unknown_keys_are_absent_or_default()
{   let req = GenerationRequest::new("Prompt")
      .unwrap()
      .with_mode_key("space-opera")
      .with_emotion_key("boredom")
      .with_length_key("epic");

    assert_eq!(req.mode(), None);
    assert_eq!(req.emotion(), None);
    assert_eq!(req.length(), StoryLength::Medium);

    let text = build_instruction(&req);
    assert!(!text.contains("STORY MODE"));
    assert!(!text.contains("EMOTIONAL CORE"));
    assert!(text.contains("📏 LENGTH: 300-500 words"));
}

#[test]
fn test_blank_optional_fields_are_omitted()
{   let req = GenerationRequest::new("Prompt")
      .unwrap()
      .with_character("   ")
      .with_tone("")
      .with_emotion_key("");

    assert_eq!(req.character(), None);
    let text = build_instruction(&req);
    assert!(!text.contains("MAIN CHARACTER"));
    assert!(!text.contains("TONE/STYLE"));
    assert!(!text.contains("EMOTIONAL CORE"));
}

#[test]
fn test_keys_are_case_insensitive()
{   assert_eq!(StoryMode::from_key(" RoleSwap "), Some(StoryMode::RoleSwap));
    assert_eq!(Emotion::from_key("FEAR"), Some(Emotion::Fear));
    assert_eq!(StoryLength::from_key("Short"), StoryLength::Short);
    for mode in StoryMode::ALL
    {   assert_eq!(StoryMode::from_key(mode.key()), Some(mode));
    }
}

#[test]
fn test_blank_prompt_is_rejected()
{   let err = assert_err!(GenerationRequest::new("  \n\t "));
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[test]
fn test_deserialized_blank_prompt_is_rejected()
{   let raw = r#"{ "prompt": "   ", "mode": "mystery", "length": "short" }"#;
    let err = assert_err!(serde_json::from_str::<GenerationRequest>(raw));
    assert!(err.to_string().contains("Please enter a story prompt"));
}

#[test]
fn test_deserialization_goes_through_builder()
{   let raw = r#"{ "prompt": "  a door  ", "character": "  ", "tone": " dark " }"#;
    let req: GenerationRequest = serde_json::from_str(raw).unwrap();
    assert_eq!(req.prompt(), "a door");
    assert_eq!(req.character(), None);
    assert_eq!(req.tone(), "dark");
    assert_eq!(req.length(), StoryLength::Medium);

    let full = GenerationRequest::new("x").unwrap()
      .with_character("Ada")
      .with_mode(Some(StoryMode::Rpg))
      .with_emotion(Some(Emotion::Hope))
      .with_length(StoryLength::Long);
    let back: GenerationRequest =
      serde_json::from_str(&serde_json::to_string(&full).unwrap()).unwrap();
    assert_eq!(back, full);
}

#[test]
fn test_prompt_is_trimmed()
{   let req = GenerationRequest::new("  spaced out  ").unwrap();
    assert_eq!(req.prompt(), "spaced out");
}

#[test]
fn test_payload_wire_shape()
{   let req = GenerationRequest::new("A lost key opens a door").unwrap();
    let payload = ProviderPayload::from_request(&req);
    let json = serde_json::to_value(&payload).unwrap();

    assert_eq!(
      json["contents"][0]["parts"][0]["text"],
      serde_json::Value::String(build_instruction(&req))
    );
    assert_eq!(json["generationConfig"]["temperature"].as_f64().map(|t| (t * 10.0).round()), Some(9.0));
    assert_eq!(json["generationConfig"]["topK"], 1);
    assert_eq!(json["generationConfig"]["topP"].as_f64(), Some(1.0));
    assert_eq!(json["generationConfig"]["maxOutputTokens"], 2048);

    let categories: Vec<&str> = json["safetySettings"]
      .as_array()
      .unwrap()
      .iter()
      .map(|s| {
        assert_eq!(s["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
        s["category"].as_str().unwrap()
      })
      .collect();
    assert_eq!(
      categories,
      vec![
        "HARM_CATEGORY_HARASSMENT"
      , "HARM_CATEGORY_HATE_SPEECH"
      , "HARM_CATEGORY_SEXUALLY_EXPLICIT"
      , "HARM_CATEGORY_DANGEROUS_CONTENT"
      ]
    );
}

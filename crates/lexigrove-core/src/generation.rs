//! Intake of content produced by the generative-AI collaborator.
//!
//! The collaborator answers with JSON text, sometimes wrapped in Markdown
//! code fences. These helpers strip the fences and parse the payloads; the
//! store applies them (see `LearningStore::apply_generated_sentences`).
//! Field values are taken as given.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::WordEnrichment;

/// One generated example sentence for a target word.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedSentence {
    pub word: String,
    pub sentence: String,
    pub translation: String,
    pub meaning: String,
    pub pronunciation: String,
    pub reason: String,
    pub used_fields: Vec<String>,
}

impl GeneratedSentence {
    pub fn enrichment(&self) -> WordEnrichment {
        WordEnrichment {
            sentence: Some(self.sentence.clone()),
            translation: Some(self.translation.clone()),
            meaning: Some(self.meaning.clone()),
            pronunciation: Some(self.pronunciation.clone()),
            reason: Some(self.reason.clone()),
        }
    }
}

/// A generated shadowing passage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedScript {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub used_fields: Vec<String>,
}

/// Remove ```` ```json ```` and ```` ``` ```` markers and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn parse_generated_sentences(text: &str) -> Result<Vec<GeneratedSentence>, StoreError> {
    serde_json::from_str(&strip_code_fences(text)).map_err(|source| StoreError::Generation {
        kind: "sentences",
        source,
    })
}

pub fn parse_generated_script(text: &str) -> Result<GeneratedScript, StoreError> {
    serde_json::from_str(&strip_code_fences(text)).map_err(|source| StoreError::Generation {
        kind: "script",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_sentences_parse() {
        let text = "```json\n[{\"word\":\"brew\",\"sentence\":\"I brew coffee.\",\
            \"translation\":\"コーヒーを淹れる。\",\"meaning\":\"淹れる\",\
            \"pronunciation\":\"/bruː/\",\"reason\":\"hobby\",\
            \"used_fields\":[\"hobbies\"]}]\n```";
        let parsed = parse_generated_sentences(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].word, "brew");
        assert_eq!(parsed[0].used_fields, vec!["hobbies"]);
        assert_eq!(parsed[0].enrichment().pronunciation.as_deref(), Some("/bruː/"));
    }

    #[test]
    fn test_script_used_fields_optional() {
        let text = r#"{"title":"Morning","content":"Good morning.","translation":"おはよう","topic":"Routine"}"#;
        let script = parse_generated_script(text).unwrap();
        assert_eq!(script.topic, "Routine");
        assert!(script.used_fields.is_empty());
    }

    #[test]
    fn test_garbage_is_a_generation_error() {
        let err = parse_generated_script("Sorry, I can't help").unwrap_err();
        assert!(matches!(err, StoreError::Generation { kind: "script", .. }));
    }
}

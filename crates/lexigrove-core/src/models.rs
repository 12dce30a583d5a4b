//! Core data models for the learning-state store.
//!
//! Every type here serializes with camelCase field names so the persisted
//! blob and backup files keep the same layout the browser build wrote:
//!
//! ```text
//! { profile, words, scripts, topicUsageHistory, growth }
//! ```
//!
//! Timestamps are epoch milliseconds ([`Millis`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Epoch milliseconds.
pub type Millis = i64;

/// Milliseconds in one day.
pub const DAY_MS: Millis = 86_400_000;

/// Usage count per personalization field (`hobbies`, `dream`, …).
pub type TopicUsage = BTreeMap<String, u64>;

/// Target proficiency used when generating content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl FromStr for Level {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            _ => Err(StoreError::InvalidValue {
                field: "level".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Voice of generated sentences and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Friendly,
    Spartan,
    Business,
    Kind,
}

impl FromStr for Tone {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "friendly" => Ok(Tone::Friendly),
            "spartan" => Ok(Tone::Spartan),
            "business" => Ok(Tone::Business),
            "kind" => Ok(Tone::Kind),
            _ => Err(StoreError::InvalidValue {
                field: "tone".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// The learner's personalization profile. Exactly one per installation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub occupation: String,
    pub hobbies: String,
    pub family: String,
    pub origin: String,
    /// Things the learner wants to study or is interested in.
    pub topics: String,
    /// Other keywords: companies, places, favourite things.
    pub additional_context: String,
    pub dream: String,
    pub level: Level,
    pub tone: Tone,
    /// Newline-separated quotes that flavour generated content.
    pub motivation_quotes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Names of the free-text profile fields, in display order.
pub const PROFILE_TEXT_FIELDS: [&str; 11] = [
    "name",
    "age",
    "gender",
    "occupation",
    "hobbies",
    "family",
    "origin",
    "topics",
    "additionalContext",
    "dream",
    "motivationQuotes",
];

impl Profile {
    /// Look up a free-text field by its wire name.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "age" => &self.age,
            "gender" => &self.gender,
            "occupation" => &self.occupation,
            "hobbies" => &self.hobbies,
            "family" => &self.family,
            "origin" => &self.origin,
            "topics" => &self.topics,
            "additionalContext" => &self.additional_context,
            "dream" => &self.dream,
            "motivationQuotes" => &self.motivation_quotes,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Shallow-merge a patch: every field present in the patch wins.
    pub fn apply(&mut self, patch: ProfilePatch) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = patch.$field { self.$field = v; })*
            };
        }
        take!(
            name,
            age,
            gender,
            occupation,
            hobbies,
            family,
            origin,
            topics,
            additional_context,
            dream,
            level,
            tone,
            motivation_quotes
        );
        if let Some(key) = patch.api_key {
            self.api_key = Some(key);
        }
    }
}

/// A partial [`Profile`]. Absent (or `null`) fields leave the current
/// value untouched when applied.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub hobbies: Option<String>,
    pub family: Option<String>,
    pub origin: Option<String>,
    pub topics: Option<String>,
    pub additional_context: Option<String>,
    pub dream: Option<String>,
    pub level: Option<Level>,
    pub tone: Option<Tone>,
    pub motivation_quotes: Option<String>,
    pub api_key: Option<String>,
}

impl ProfilePatch {
    /// Build a patch that sets one field from its wire name and a raw value.
    pub fn single(field: &str, value: &str) -> Result<Self, StoreError> {
        let mut patch = ProfilePatch::default();
        let text = Some(value.to_string());
        match field {
            "name" => patch.name = text,
            "age" => patch.age = text,
            "gender" => patch.gender = text,
            "occupation" => patch.occupation = text,
            "hobbies" => patch.hobbies = text,
            "family" => patch.family = text,
            "origin" => patch.origin = text,
            "topics" => patch.topics = text,
            "additionalContext" => patch.additional_context = text,
            "dream" => patch.dream = text,
            "motivationQuotes" => patch.motivation_quotes = text,
            "apiKey" => patch.api_key = text,
            "level" => patch.level = Some(value.parse()?),
            "tone" => patch.tone = Some(value.parse()?),
            other => return Err(StoreError::UnknownField(other.to_string())),
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }
}

/// Lifecycle status of a vocabulary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    New,
    Learning,
    Review,
    Mastered,
}

impl WordStatus {
    pub const ALL: [WordStatus; 4] = [
        WordStatus::New,
        WordStatus::Learning,
        WordStatus::Review,
        WordStatus::Mastered,
    ];

    /// Merge priority: `mastered > review > learning > new`.
    pub fn priority(self) -> u8 {
        match self {
            WordStatus::Mastered => 4,
            WordStatus::Review => 3,
            WordStatus::Learning => 2,
            WordStatus::New => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WordStatus::New => "new",
            WordStatus::Learning => "learning",
            WordStatus::Review => "review",
            WordStatus::Mastered => "mastered",
        }
    }
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WordStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StoreError::InvalidValue {
                field: "status".to_string(),
                value: s.to_string(),
            })
    }
}

/// AI-generated content attached to a word. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordEnrichment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Definition of the word itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    /// IPA transcription, e.g. `/wɜːrd/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    /// Why the sentence fits the learner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl WordEnrichment {
    /// Shallow merge: fields present in `other` replace ours.
    pub fn merge_from(&mut self, other: &WordEnrichment) {
        for (mine, theirs) in [
            (&mut self.sentence, &other.sentence),
            (&mut self.translation, &other.translation),
            (&mut self.meaning, &other.meaning),
            (&mut self.pronunciation, &other.pronunciation),
            (&mut self.reason, &other.reason),
        ] {
            if theirs.is_some() {
                *mine = theirs.clone();
            }
        }
    }

    /// A word still needs generation while it lacks a sentence, meaning,
    /// or pronunciation.
    pub fn is_complete(&self) -> bool {
        self.sentence.is_some() && self.meaning.is_some() && self.pronunciation.is_some()
    }
}

/// A vocabulary item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordItem {
    pub id: String,
    pub word: String,
    pub status: WordStatus,
    #[serde(default)]
    pub added_at: Millis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<Millis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastered_at: Option<Millis>,
    /// Number of status updates this word has received.
    #[serde(default)]
    pub learning_count: u32,
    #[serde(flatten)]
    pub enrichment: WordEnrichment,
}

impl WordItem {
    /// Case-insensitive identity key.
    pub fn key(&self) -> String {
        self.word.to_lowercase()
    }
}

/// A generated passage for listen-and-repeat practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowingScript {
    pub id: String,
    pub title: String,
    /// English text.
    pub content: String,
    pub translation: String,
    pub topic: String,
    pub created_at: Millis,
}

/// Daily-streak gamification state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrowthState {
    /// Completed 30-stage cycles.
    pub total_trees: u32,
    /// Progress in the current cycle, `0..=30`.
    pub current_stage: u32,
    /// Last recorded activity, `0` when never recorded.
    pub last_activity_date: Millis,
}

/// The whole persisted store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub profile: Profile,
    pub words: Vec<WordItem>,
    /// Newest first.
    pub scripts: Vec<ShadowingScript>,
    pub topic_usage_history: TopicUsage,
    pub growth: GrowthState,
}

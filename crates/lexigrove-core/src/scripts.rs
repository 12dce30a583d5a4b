//! Shadowing script repository. Newest first; scripts are never edited.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::models::{Millis, ShadowingScript};

impl ShadowingScript {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        translation: impl Into<String>,
        topic: impl Into<String>,
        now: Millis,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            translation: translation.into(),
            topic: topic.into(),
            created_at: now,
        }
    }
}

pub fn add_script(scripts: &mut Vec<ShadowingScript>, script: ShadowingScript) {
    scripts.insert(0, script);
}

pub fn delete_script(scripts: &mut Vec<ShadowingScript>, id: &str) -> bool {
    let before = scripts.len();
    scripts.retain(|s| s.id != id);
    scripts.len() != before
}

/// Topics of the `n` newest scripts, so the generator can avoid repeats.
pub fn recent_topics(scripts: &[ShadowingScript], n: usize) -> Vec<&str> {
    scripts.iter().take(n).map(|s| s.topic.as_str()).collect()
}

/// A run of text up to sentence-ending punctuation (plus a closing quote),
/// or the unterminated tail.
static SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^.!?]+[.!?]+["']?|[^.!?]+$"#).expect("sentence pattern compiles")
});

pub fn find_script<'a>(scripts: &'a [ShadowingScript], id: &str) -> Option<&'a ShadowingScript> {
    scripts.iter().find(|s| s.id == id)
}

/// Split script content into sentences for step-by-step practice.
/// Text with no recognisable sentence comes back whole.
pub fn split_sentences(text: &str) -> Vec<String> {
    let sentences: Vec<String> = SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.is_empty() && !text.trim().is_empty() {
        return vec![text.trim().to_string()];
    }
    sentences
}

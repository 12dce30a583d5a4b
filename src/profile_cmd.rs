//! `grove profile …`: show and edit the learner profile.

use anyhow::Result;
use lexigrove_core::models::{ProfilePatch, PROFILE_TEXT_FIELDS};
use lexigrove_core::LearningStore;

/// Print every profile field. The API key is masked.
pub fn run_show(store: &LearningStore) -> Result<()> {
    let profile = store.profile();
    for field in PROFILE_TEXT_FIELDS {
        let value = profile.text_field(field).unwrap_or("");
        println!("{:<18} {}", field, value.replace('\n', ", "));
    }
    println!("{:<18} {:?}", "level", profile.level);
    println!("{:<18} {:?}", "tone", profile.tone);
    let key = match &profile.api_key {
        Some(k) if !k.is_empty() => "(set)",
        _ => "(unset)",
    };
    println!("{:<18} {}", "apiKey", key);
    Ok(())
}

/// Set one field by its wire name (`hobbies`, `additionalContext`, `level`, …).
pub fn run_set(store: &mut LearningStore, field: &str, value: &str) -> Result<()> {
    let patch = ProfilePatch::single(field, value)?;
    store.update_profile(patch)?;
    println!("Updated {}", field);
    Ok(())
}

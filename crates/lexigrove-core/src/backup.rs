//! Backup export and merge-on-import.
//!
//! A backup is a JSON document:
//!
//! ```text
//! { version: 1, exportedAt, profile, words, topicUsageHistory, growth }
//! ```
//!
//! Scripts are not part of backups.
//!
//! # Import merge
//!
//! | Data      | Rule |
//! |-----------|------|
//! | profile   | per-field shallow merge, imported values win |
//! | words     | keyed by lowercase text, see below |
//! | growth    | replaced wholesale when present |
//! | ledger    | untouched |
//! | scripts   | untouched |
//!
//! Words present on both sides are settled by status priority
//! (`mastered > review > learning > new`). The imported record wins
//! wholesale when its priority is greater **or equal**; otherwise the local
//! record stays. Either way `learning_count` becomes the larger of the two.
//! Under [`IdPolicy::Winner`] the winning record keeps its own id, so an
//! import can change a word's id.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::growth::{clamp_growth, CalendarPolicy};
use crate::models::{
    AppState, GrowthState, Millis, Profile, ProfilePatch, TopicUsage, WordItem, WordStatus,
};

pub const BACKUP_VERSION: u32 = 1;

/// Which id survives when both sides hold the same word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// The id travels with the winning record.
    #[default]
    Winner,
    /// The local id is kept even when the imported record wins.
    Local,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupOut<'a> {
    version: u32,
    exported_at: Millis,
    profile: &'a Profile,
    words: &'a [WordItem],
    topic_usage_history: &'a TopicUsage,
    growth: &'a GrowthState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackupIn {
    #[serde(default)]
    profile: Option<ProfilePatch>,
    words: Vec<WordItem>,
    #[serde(default)]
    growth: Option<GrowthState>,
}

/// Serialize a backup of `state` as pretty JSON.
pub fn export_snapshot(state: &AppState, now: Millis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&BackupOut {
        version: BACKUP_VERSION,
        exported_at: now,
        profile: &state.profile,
        words: &state.words,
        topic_usage_history: &state.topic_usage_history,
        growth: &state.growth,
    })
}

/// Suggested download name, e.g. `lexigrove_backup_2024-03-10.json`.
pub fn backup_file_name(now: Millis, calendar: &CalendarPolicy) -> String {
    let date: NaiveDate = calendar.date_of(now);
    format!("lexigrove_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Why a backup could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRejection {
    NotJson,
    MissingWords,
    Malformed(String),
}

impl ImportRejection {
    pub fn message(&self) -> String {
        match self {
            ImportRejection::NotJson => "Failed to parse JSON".to_string(),
            ImportRejection::MissingWords => "Invalid backup format: no word list".to_string(),
            ImportRejection::Malformed(detail) => format!("Invalid backup format: {detail}"),
        }
    }
}

/// Per-word tallies of a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    /// Words only in the import.
    pub added: usize,
    /// Conflicts won by the imported record.
    pub replaced: usize,
    /// Conflicts won by the local record.
    pub kept: usize,
}

/// Everything an import would change, computed without touching the store.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub profile: Profile,
    pub words: Vec<WordItem>,
    pub growth: Option<GrowthState>,
    pub stats: MergeStats,
}

/// Result reported to the caller of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub success: bool,
    pub message: String,
    pub stats: MergeStats,
}

impl ImportOutcome {
    pub fn failed(rejection: &ImportRejection) -> Self {
        Self {
            success: false,
            message: rejection.message(),
            stats: MergeStats::default(),
        }
    }

    pub fn merged(stats: MergeStats) -> Self {
        Self {
            success: true,
            message: format!(
                "Import merged: {} added, {} updated from backup, {} kept local",
                stats.added, stats.replaced, stats.kept
            ),
            stats,
        }
    }
}

/// Parse `text` and work out the merged profile, words and growth.
pub fn plan_import(
    state: &AppState,
    text: &str,
    policy: IdPolicy,
) -> Result<ImportPlan, ImportRejection> {
    let mut value: serde_json::Value =
        serde_json::from_str(text).map_err(|_| ImportRejection::NotJson)?;
    match value.get("words") {
        None | Some(serde_json::Value::Null) => return Err(ImportRejection::MissingWords),
        Some(_) => {}
    }
    let unknown = demote_unknown_statuses(&mut value);
    if unknown > 0 {
        tracing::warn!(count = unknown, "backup words with unknown status read as new");
    }
    let backup: BackupIn =
        serde_json::from_value(value).map_err(|e| ImportRejection::Malformed(e.to_string()))?;

    let mut profile = state.profile.clone();
    if let Some(patch) = backup.profile {
        profile.apply(patch);
    }

    let (words, stats) = merge_words(&state.words, backup.words, policy);

    Ok(ImportPlan {
        profile,
        words,
        growth: backup.growth.map(clamp_growth),
        stats,
    })
}

/// Rewrite word statuses this version does not know (e.g. from a newer
/// app) to `new`, so one odd record does not sink the whole backup.
/// Returns how many were rewritten.
fn demote_unknown_statuses(value: &mut serde_json::Value) -> usize {
    let Some(words) = value.get_mut("words").and_then(|w| w.as_array_mut()) else {
        return 0;
    };
    let mut demoted = 0;
    for word in words {
        let Some(status) = word.get_mut("status") else {
            continue;
        };
        let known = status
            .as_str()
            .map_or(true, |s| WordStatus::ALL.iter().any(|st| st.as_str() == s));
        if !known {
            *status = serde_json::Value::from(WordStatus::New.as_str());
            demoted += 1;
        }
    }
    demoted
}

/// Reconcile two word lists by lowercase text.
///
/// Output order: local words in their original order (conflicts resolved
/// in place), then import-only words in import order.
pub fn merge_words(
    local: &[WordItem],
    incoming: Vec<WordItem>,
    policy: IdPolicy,
) -> (Vec<WordItem>, MergeStats) {
    let mut merged: Vec<WordItem> = local.to_vec();
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, w)| (w.key(), i))
        .collect();
    let mut stats = MergeStats::default();

    for theirs in incoming {
        let key = theirs.key();
        let Some(&slot) = index.get(&key) else {
            index.insert(key, merged.len());
            merged.push(theirs);
            stats.added += 1;
            continue;
        };

        let ours = &mut merged[slot];
        let learning_count = ours.learning_count.max(theirs.learning_count);
        if theirs.status.priority() >= ours.status.priority() {
            let local_id = std::mem::take(&mut ours.id);
            *ours = theirs;
            if policy == IdPolicy::Local {
                ours.id = local_id;
            }
            stats.replaced += 1;
        } else {
            stats.kept += 1;
        }
        ours.learning_count = learning_count;
    }

    (merged, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WordEnrichment, WordStatus};

    fn word(id: &str, text: &str, status: WordStatus, count: u32) -> WordItem {
        WordItem {
            id: id.into(),
            word: text.into(),
            status,
            added_at: 1,
            last_reviewed_at: None,
            mastered_at: None,
            learning_count: count,
            enrichment: WordEnrichment::default(),
        }
    }

    fn backup_json(words: &[WordItem]) -> String {
        serde_json::json!({ "version": 1, "words": words }).to_string()
    }

    #[test]
    fn test_imported_higher_status_wins_with_max_count() {
        let local = vec![word("local-cat", "Cat", WordStatus::Learning, 2)];
        let mut imported = word("import-cat", "cat", WordStatus::Mastered, 1);
        imported.enrichment.meaning = Some("ねこ".into());
        let (merged, stats) = merge_words(&local, vec![imported], IdPolicy::Winner);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, WordStatus::Mastered);
        assert_eq!(merged[0].learning_count, 2);
        assert_eq!(merged[0].word, "cat");
        assert_eq!(merged[0].enrichment.meaning.as_deref(), Some("ねこ"));
        assert_eq!(stats.replaced, 1);
    }

    #[test]
    fn test_local_higher_status_kept_with_max_count() {
        let local = vec![word("local-dog", "Dog", WordStatus::Mastered, 5)];
        let imported = word("import-dog", "dog", WordStatus::New, 0);
        let (merged, stats) = merge_words(&local, vec![imported], IdPolicy::Winner);
        assert_eq!(merged[0].id, "local-dog");
        assert_eq!(merged[0].word, "Dog");
        assert_eq!(merged[0].status, WordStatus::Mastered);
        assert_eq!(merged[0].learning_count, 5);
        assert_eq!(stats.kept, 1);
    }

    #[test]
    fn test_local_kept_still_takes_larger_imported_count() {
        let local = vec![word("l", "fox", WordStatus::Review, 1)];
        let imported = word("i", "fox", WordStatus::Learning, 9);
        let (merged, _) = merge_words(&local, vec![imported], IdPolicy::Winner);
        assert_eq!(merged[0].id, "l");
        assert_eq!(merged[0].learning_count, 9);
    }

    #[test]
    fn test_tie_takes_imported_record_and_its_id() {
        let local = vec![word("local-id", "owl", WordStatus::Learning, 3)];
        let imported = word("import-id", "OWL", WordStatus::Learning, 1);
        let (merged, _) = merge_words(&local, vec![imported], IdPolicy::Winner);
        assert_eq!(merged[0].id, "import-id");
        assert_eq!(merged[0].word, "OWL");
        assert_eq!(merged[0].learning_count, 3);
    }

    #[test]
    fn test_local_id_policy_keeps_local_id_on_win() {
        let local = vec![word("local-id", "owl", WordStatus::New, 0)];
        let imported = word("import-id", "owl", WordStatus::Mastered, 4);
        let (merged, _) = merge_words(&local, vec![imported], IdPolicy::Local);
        assert_eq!(merged[0].id, "local-id");
        assert_eq!(merged[0].status, WordStatus::Mastered);
    }

    #[test]
    fn test_union_order_local_then_new() {
        let local = vec![
            word("1", "a", WordStatus::New, 0),
            word("2", "b", WordStatus::New, 0),
        ];
        let incoming = vec![
            word("3", "c", WordStatus::New, 0),
            word("4", "B", WordStatus::Review, 0),
            word("5", "d", WordStatus::New, 0),
        ];
        let (merged, stats) = merge_words(&local, incoming, IdPolicy::Winner);
        let texts: Vec<&str> = merged.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(texts, vec!["a", "B", "c", "d"]);
        assert_eq!(
            stats,
            MergeStats {
                added: 2,
                replaced: 1,
                kept: 0
            }
        );
    }

    #[test]
    fn test_plan_rejects_non_json_and_missing_words() {
        let state = AppState::default();
        assert_eq!(
            plan_import(&state, "not json {", IdPolicy::Winner).unwrap_err(),
            ImportRejection::NotJson
        );
        assert_eq!(
            plan_import(&state, r#"{"version":1,"profile":{}}"#, IdPolicy::Winner).unwrap_err(),
            ImportRejection::MissingWords
        );
        assert_eq!(
            plan_import(&state, r#"{"words":null}"#, IdPolicy::Winner).unwrap_err(),
            ImportRejection::MissingWords
        );
        assert!(matches!(
            plan_import(&state, r#"{"words":[{"word":"x"}]}"#, IdPolicy::Winner),
            Err(ImportRejection::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_status_is_read_as_new() {
        let mut state = AppState::default();
        state.words.push(word("l1", "kept", WordStatus::Learning, 1));
        let text = serde_json::json!({
            "words": [
                { "id": "a", "word": "fresh", "status": "archived", "addedAt": 1 },
                { "id": "b", "word": "Kept", "status": "archived", "addedAt": 1, "learningCount": 4 },
                { "id": "c", "word": "plain", "status": "review", "addedAt": 1 }
            ]
        })
        .to_string();
        let plan = plan_import(&state, &text, IdPolicy::Winner).unwrap();
        assert_eq!(plan.words.len(), 3);
        assert_eq!(plan.words[0].status, WordStatus::Learning);
        assert_eq!(plan.words[0].id, "l1");
        assert_eq!(plan.words[0].learning_count, 4);
        assert_eq!(plan.words[1].word, "fresh");
        assert_eq!(plan.words[1].status, WordStatus::New);
        assert_eq!(plan.words[2].status, WordStatus::Review);
    }

    #[test]
    fn test_non_string_status_still_rejected() {
        let text = r#"{"words":[{"id":"a","word":"x","status":3}]}"#;
        assert!(matches!(
            plan_import(&AppState::default(), text, IdPolicy::Winner),
            Err(ImportRejection::Malformed(_))
        ));
    }

    #[test]
    fn test_imported_stage_is_clamped() {
        let text = r#"{"words":[],"growth":{"totalTrees":2,"currentStage":4294967295,"lastActivityDate":10}}"#;
        let plan = plan_import(&AppState::default(), text, IdPolicy::Winner).unwrap();
        let growth = plan.growth.unwrap();
        assert_eq!(growth.current_stage, crate::growth::MAX_STAGE);
        assert_eq!(growth.total_trees, 2);
    }

    #[test]
    fn test_plan_merges_profile_and_replaces_growth() {
        let mut state = AppState::default();
        state.profile.name = "Aki".into();
        state.profile.dream = "ship a game".into();
        state.growth.current_stage = 7;
        let text = serde_json::json!({
            "words": [],
            "profile": { "dream": "run a marathon", "tone": "kind" },
            "growth": { "totalTrees": 2, "currentStage": 11, "lastActivityDate": 99 }
        })
        .to_string();
        let plan = plan_import(&state, &text, IdPolicy::Winner).unwrap();
        assert_eq!(plan.profile.name, "Aki");
        assert_eq!(plan.profile.dream, "run a marathon");
        assert_eq!(plan.growth.unwrap().current_stage, 11);
    }

    #[test]
    fn test_plan_without_growth_leaves_it_alone() {
        let state = AppState::default();
        let plan = plan_import(&state, &backup_json(&[]), IdPolicy::Winner).unwrap();
        assert!(plan.growth.is_none());
    }

    #[test]
    fn test_export_shape() {
        let mut state = AppState::default();
        state.words.push(word("1", "a", WordStatus::New, 0));
        state
            .scripts
            .push(crate::models::ShadowingScript::new("t", "c", "tr", "topic", 1));
        let json: serde_json::Value =
            serde_json::from_str(&export_snapshot(&state, 1234).unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["exportedAt"], 1234);
        assert_eq!(json["words"].as_array().unwrap().len(), 1);
        assert!(json.get("scripts").is_none());
        assert!(json.get("topicUsageHistory").is_some());
        assert!(json.get("growth").is_some());
    }

    #[test]
    fn test_backup_file_name() {
        // 2024-03-10T12:00:00Z
        let name = backup_file_name(1_710_072_000_000, &CalendarPolicy::utc());
        assert_eq!(name, "lexigrove_backup_2024-03-10.json");
    }
}

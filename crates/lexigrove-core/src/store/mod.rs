//! The learning-state store.
//!
//! [`LearningStore`] is the single owner of an [`AppState`]. All mutations
//! go through it; after each one that actually changes something, the full
//! state is handed to the injected [`StateSink`] (write-through, one write
//! per committed mutation). No-ops are not persisted.
//!
//! Time comes from an injected [`Clock`], and calendar days from the
//! configured [`CalendarPolicy`], so the whole store runs deterministically
//! under test with a [`ManualClock`](crate::clock::ManualClock) and a
//! [`MemorySink`](memory::MemorySink).
//!
//! # Operations
//!
//! | Area    | Methods |
//! |---------|---------|
//! | profile | [`update_profile`](LearningStore::update_profile) |
//! | words   | [`add_word`](LearningStore::add_word), [`add_words_bulk`](LearningStore::add_words_bulk), [`update_word_status`](LearningStore::update_word_status), [`apply_review_event`](LearningStore::apply_review_event), [`update_word_content`](LearningStore::update_word_content), [`delete_word`](LearningStore::delete_word) |
//! | scripts | [`add_script`](LearningStore::add_script), [`delete_script`](LearningStore::delete_script) |
//! | topics  | [`update_topic_usage`](LearningStore::update_topic_usage) |
//! | growth  | [`check_daily_growth`](LearningStore::check_daily_growth), [`debug_set_growth`](LearningStore::debug_set_growth) |
//! | backup  | [`export_data`](LearningStore::export_data), [`import_data`](LearningStore::import_data) |
//! | AI      | [`apply_generated_sentences`](LearningStore::apply_generated_sentences), [`apply_generated_script`](LearningStore::apply_generated_script) |

pub mod memory;

use tracing::{debug, info, warn};

use crate::backup::{self, IdPolicy, ImportOutcome};
use crate::clock::Clock;
use crate::error::StoreError;
use crate::generation::{GeneratedScript, GeneratedSentence};
use crate::growth::{self, CalendarPolicy, GrowthChange};
use crate::models::{
    AppState, GrowthState, Profile, ProfilePatch, ShadowingScript, TopicUsage, WordEnrichment,
    WordItem, WordStatus,
};
use crate::study::{self, WordStats};
use crate::topics::{self, ScriptFocus};
use crate::transitions::{self, ReviewEvent, TransitionOutcome};
use crate::{scripts, words};

/// Where committed state goes.
///
/// Called once per committed mutation with the complete state. An error
/// is returned to the caller of the mutation; the in-memory state keeps
/// the change.
pub trait StateSink: Send + Sync {
    fn persist(&self, state: &AppState) -> Result<(), StoreError>;
}

/// Knobs that change store behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub calendar: CalendarPolicy,
    pub id_policy: IdPolicy,
}

pub struct LearningStore {
    state: AppState,
    sink: Box<dyn StateSink>,
    clock: Box<dyn Clock>,
    options: StoreOptions,
}

impl LearningStore {
    pub fn new(
        state: AppState,
        sink: Box<dyn StateSink>,
        clock: Box<dyn Clock>,
        options: StoreOptions,
    ) -> Self {
        Self {
            state,
            sink,
            clock,
            options,
        }
    }

    fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    fn commit(&self, op: &'static str) -> Result<(), StoreError> {
        debug!(op, words = self.state.words.len(), "committing state");
        self.sink.persist(&self.state)
    }

    // ── reads ──────────────────────────────────────────────────────────

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.state.profile
    }

    pub fn words(&self) -> &[WordItem] {
        &self.state.words
    }

    pub fn scripts(&self) -> &[ShadowingScript] {
        &self.state.scripts
    }

    pub fn topic_usage(&self) -> &TopicUsage {
        &self.state.topic_usage_history
    }

    pub fn growth(&self) -> &GrowthState {
        &self.state.growth
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn find_word(&self, id_or_text: &str) -> Option<&WordItem> {
        words::find_by_id(&self.state.words, id_or_text)
            .or_else(|| words::find_by_text(&self.state.words, id_or_text))
    }

    pub fn words_needing_enrichment(&self) -> Vec<&WordItem> {
        words::words_needing_enrichment(&self.state.words)
    }

    pub fn new_deck(&self, limit: usize) -> Vec<&WordItem> {
        study::new_deck(&self.state.words, limit)
    }

    pub fn review_deck(&self, limit: usize) -> Vec<&WordItem> {
        study::review_deck(&self.state.words, limit)
    }

    pub fn word_stats(&self) -> WordStats {
        WordStats::from_words(&self.state.words)
    }

    pub fn sentence_focus(&self) -> Vec<&'static str> {
        topics::sentence_focus(&self.state.topic_usage_history)
    }

    pub fn sentence_avoid(&self) -> Vec<&'static str> {
        topics::sentence_avoid(&self.state.topic_usage_history)
    }

    pub fn script_focus(&self) -> ScriptFocus {
        topics::script_focus(&self.state.topic_usage_history, &self.state.profile)
    }

    pub fn find_script(&self, id: &str) -> Option<&ShadowingScript> {
        scripts::find_script(&self.state.scripts, id)
    }

    pub fn recent_topics(&self, n: usize) -> Vec<&str> {
        scripts::recent_topics(&self.state.scripts, n)
    }

    // ── profile ────────────────────────────────────────────────────────

    /// Shallow-merge `patch` into the profile.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }
        self.state.profile.apply(patch);
        self.commit("update_profile")
    }

    // ── words ──────────────────────────────────────────────────────────

    pub fn add_word(&mut self, text: &str) -> Result<Option<String>, StoreError> {
        let now = self.now();
        let added = words::add_word(&mut self.state.words, text, now);
        if added.is_some() {
            self.commit("add_word")?;
        }
        Ok(added)
    }

    pub fn add_words_bulk<S: AsRef<str>>(&mut self, texts: &[S]) -> Result<Vec<String>, StoreError> {
        let now = self.now();
        let added = words::add_words_bulk(&mut self.state.words, texts, now);
        if !added.is_empty() {
            self.commit("add_words_bulk")?;
        }
        Ok(added)
    }

    /// Raw status setter; any status may be requested.
    pub fn update_word_status(&mut self, id: &str, status: WordStatus) -> Result<bool, StoreError> {
        let now = self.now();
        let found = words::update_word_status(&mut self.state.words, id, status, now);
        if found {
            self.commit("update_word_status")?;
        }
        Ok(found)
    }

    /// Move a word along the transition table. Rejected pairs leave the
    /// word untouched.
    pub fn apply_review_event(
        &mut self,
        id: &str,
        event: ReviewEvent,
    ) -> Result<TransitionOutcome, StoreError> {
        let Some(current) = words::find_by_id(&self.state.words, id).map(|w| w.status) else {
            return Ok(TransitionOutcome::NotFound);
        };
        match transitions::next_status(current, event) {
            Some(next) => {
                self.update_word_status(id, next)?;
                Ok(TransitionOutcome::Moved {
                    from: current,
                    to: next,
                })
            }
            None => {
                debug!(id, %current, %event, "transition rejected");
                Ok(TransitionOutcome::Rejected { status: current })
            }
        }
    }

    pub fn update_word_content(
        &mut self,
        id: &str,
        content: &WordEnrichment,
    ) -> Result<bool, StoreError> {
        let found = words::update_word_content(&mut self.state.words, id, content);
        if found {
            self.commit("update_word_content")?;
        }
        Ok(found)
    }

    pub fn delete_word(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = words::delete_word(&mut self.state.words, id);
        if removed {
            self.commit("delete_word")?;
        }
        Ok(removed)
    }

    // ── scripts ────────────────────────────────────────────────────────

    pub fn add_script(&mut self, script: ShadowingScript) -> Result<(), StoreError> {
        scripts::add_script(&mut self.state.scripts, script);
        self.commit("add_script")
    }

    pub fn delete_script(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = scripts::delete_script(&mut self.state.scripts, id);
        if removed {
            self.commit("delete_script")?;
        }
        Ok(removed)
    }

    // ── topics ─────────────────────────────────────────────────────────

    pub fn update_topic_usage<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<(), StoreError> {
        if fields.is_empty() {
            return Ok(());
        }
        topics::update_topic_usage(&mut self.state.topic_usage_history, fields);
        self.commit("update_topic_usage")
    }

    // ── growth ─────────────────────────────────────────────────────────

    pub fn check_daily_growth(&mut self) -> Result<GrowthChange, StoreError> {
        let now = self.now();
        let change = growth::check_daily_growth(&mut self.state.growth, now, &self.options.calendar);
        match change {
            GrowthChange::ClockSkew { days } => {
                warn!(days, "clock is behind the last recorded activity; growth unchanged");
            }
            GrowthChange::Grew { matured: true, .. } => {
                info!(total_trees = self.state.growth.total_trees, "tree matured");
            }
            _ => {}
        }
        if change.changed_state() {
            self.commit("check_daily_growth")?;
        }
        Ok(change)
    }

    /// Overwrite growth, backdating the last activity by `days_ago` days.
    /// An out-of-range `days_ago` is rejected and nothing is written.
    pub fn debug_set_growth(
        &mut self,
        stage: u32,
        total_trees: u32,
        days_ago: i64,
    ) -> Result<(), StoreError> {
        let now = self.now();
        self.state.growth = growth::debug_growth(stage, total_trees, days_ago, now)?;
        self.commit("debug_set_growth")
    }

    // ── backup ─────────────────────────────────────────────────────────

    pub fn export_data(&self) -> Result<String, StoreError> {
        let json = backup::export_snapshot(&self.state, self.now())?;
        info!(words = self.state.words.len(), "exported backup");
        Ok(json)
    }

    pub fn backup_file_name(&self) -> String {
        backup::backup_file_name(self.now(), &self.options.calendar)
    }

    /// Merge a backup into the store.
    ///
    /// Bad input never errors: it yields `success: false` and leaves the
    /// state untouched. Only a persistence failure is returned as `Err`.
    pub fn import_data(&mut self, text: &str) -> Result<ImportOutcome, StoreError> {
        let plan = match backup::plan_import(&self.state, text, self.options.id_policy) {
            Ok(plan) => plan,
            Err(rejection) => {
                warn!(reason = %rejection.message(), "backup rejected");
                return Ok(ImportOutcome::failed(&rejection));
            }
        };

        self.state.profile = plan.profile;
        self.state.words = plan.words;
        if let Some(growth) = plan.growth {
            self.state.growth = growth;
        }
        self.commit("import_data")?;

        info!(
            added = plan.stats.added,
            replaced = plan.stats.replaced,
            kept = plan.stats.kept,
            "imported backup"
        );
        Ok(ImportOutcome::merged(plan.stats))
    }

    // ── generation intake ──────────────────────────────────────────────

    /// Attach generated sentences to words that still need them, matching
    /// by word text, and count every reported `used_fields` entry.
    /// Returns how many words were enriched.
    pub fn apply_generated_sentences(
        &mut self,
        results: &[GeneratedSentence],
    ) -> Result<usize, StoreError> {
        let mut enriched = 0;
        let mut used: Vec<&str> = Vec::new();
        for result in results {
            used.extend(result.used_fields.iter().map(String::as_str));
            let key = result.word.trim().to_lowercase();
            let target = self
                .state
                .words
                .iter_mut()
                .find(|w| !w.enrichment.is_complete() && w.key() == key);
            match target {
                Some(item) => {
                    item.enrichment.merge_from(&result.enrichment());
                    enriched += 1;
                }
                None => debug!(word = %result.word, "no pending word for generated sentence"),
            }
        }

        if enriched == 0 && used.is_empty() {
            return Ok(0);
        }
        topics::update_topic_usage(&mut self.state.topic_usage_history, &used);
        self.commit("apply_generated_sentences")?;
        Ok(enriched)
    }

    /// Store a generated script (newest first) and count its `used_fields`.
    pub fn apply_generated_script(
        &mut self,
        generated: GeneratedScript,
    ) -> Result<ShadowingScript, StoreError> {
        let script = ShadowingScript::new(
            generated.title,
            generated.content,
            generated.translation,
            generated.topic,
            self.now(),
        );
        scripts::add_script(&mut self.state.scripts, script.clone());
        topics::update_topic_usage(&mut self.state.topic_usage_history, &generated.used_fields);
        self.commit("apply_generated_script")?;
        Ok(script)
    }
}

//! Topic usage ledger and topic balancing.
//!
//! The generator reports which profile fields it drew on (`used_fields`);
//! the ledger counts them. Balancing reads the counts back to steer the next
//! request toward fields that have been used least.

use crate::models::{Profile, TopicUsage};

/// Fields eligible as context for word sentences.
pub const SENTENCE_FIELDS: [&str; 7] = [
    "occupation",
    "family",
    "origin",
    "hobbies",
    "topics",
    "additionalContext",
    "dream",
];

/// Fields eligible as context for shadowing scripts.
pub const SCRIPT_FIELDS: [&str; 3] = ["hobbies", "topics", "dream"];

/// Number of under-used fields suggested for sentences.
const SENTENCE_FOCUS_COUNT: usize = 3;

/// A field must have been used more than this to be avoided.
const AVOID_THRESHOLD: u64 = 2;

/// Add one use for each listed field. Unknown keys start at zero.
pub fn update_topic_usage<S: AsRef<str>>(ledger: &mut TopicUsage, fields: &[S]) {
    for field in fields {
        *ledger.entry(field.as_ref().to_string()).or_insert(0) += 1;
    }
}

pub fn usage_of(ledger: &TopicUsage, field: &str) -> u64 {
    ledger.get(field).copied().unwrap_or(0)
}

fn by_usage(ledger: &TopicUsage) -> Vec<&'static str> {
    let mut fields = SENTENCE_FIELDS.to_vec();
    fields.sort_by_key(|f| usage_of(ledger, f));
    fields
}

/// The least-used sentence fields, fewest uses first.
pub fn sentence_focus(ledger: &TopicUsage) -> Vec<&'static str> {
    by_usage(ledger)
        .into_iter()
        .take(SENTENCE_FOCUS_COUNT)
        .collect()
}

/// Of the two most-used sentence fields, those already used more than twice.
pub fn sentence_avoid(ledger: &TopicUsage) -> Vec<&'static str> {
    let sorted = by_usage(ledger);
    sorted[sorted.len() - 2..]
        .iter()
        .copied()
        .filter(|f| usage_of(ledger, f) > AVOID_THRESHOLD)
        .collect()
}

/// Count comma/newline separated entries in a profile field.
pub fn count_items(text: &str) -> usize {
    text.split(['\n', ','])
        .filter(|s| !s.trim().is_empty())
        .count()
}

/// Primary and secondary context fields for the next script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptFocus {
    pub primary: &'static str,
    pub secondary: &'static str,
}

/// Rank script fields by usage density, `uses / (items + 1)`, so a field
/// listing five hobbies is not treated as overused after two scripts.
pub fn script_focus(ledger: &TopicUsage, profile: &Profile) -> ScriptFocus {
    let density = |field: &str| {
        let items = profile.text_field(field).map(count_items).unwrap_or(0);
        usage_of(ledger, field) as f64 / (items + 1) as f64
    };
    let mut fields = SCRIPT_FIELDS.to_vec();
    fields.sort_by(|a, b| {
        density(*a)
            .partial_cmp(&density(*b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ScriptFocus {
        primary: fields[0],
        secondary: fields[1],
    }
}

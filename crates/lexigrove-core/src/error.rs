use thiserror::Error;

/// Errors surfaced by the learning-state store.
///
/// Validation problems in mutations (empty word, unknown id) are not errors;
/// those operations are silent no-ops. Malformed backups are reported through
/// [`ImportOutcome`](crate::backup::ImportOutcome), never through this type.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist state: {0}")]
    Persistence(String),

    #[error("failed to serialize state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("could not parse generated {kind}: {source}")]
    Generation {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown profile field: {0}")]
    UnknownField(String),

    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },
}

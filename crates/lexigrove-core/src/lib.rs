//! # Lexigrove Core
//!
//! I/O-free logic for Lexigrove: the learning-state data model, word and
//! script repositories, topic usage ledger, growth tracker, status
//! transition table, backup merge, and the [`store::LearningStore`]
//! controller with its persistence port.
//!
//! This crate never touches the filesystem, the network, or the host
//! clock directly; storage and time are injected. The `lexigrove` crate
//! wires it to a JSON file and a CLI.

pub mod backup;
pub mod clock;
pub mod error;
pub mod generation;
pub mod growth;
pub mod models;
pub mod scripts;
pub mod store;
pub mod study;
pub mod topics;
pub mod transitions;
pub mod words;

pub use error::StoreError;
pub use store::{LearningStore, StateSink, StoreOptions};

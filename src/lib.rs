//! # Lexigrove
//!
//! A local-first learning-state store for English vocabulary and shadowing
//! practice.
//!
//! The pure logic (data model, repositories, topic ledger, growth tracker,
//! backup merge) lives in the `lexigrove-core` crate. This crate wires it to
//! a JSON state file, a TOML config, and the `grove` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────────┐   ┌─────────────┐
//! │   CLI    │──▶│ LearningStore  │──▶│  FileSink   │
//! │ (grove)  │   │  (core crate)  │   │ state.json  │
//! └──────────┘   └────────────────┘   └─────────────┘
//!                        ▲
//!          AI collaborator JSON (generate)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! grove init                          # write config + empty state
//! grove word bulk "serendipity, grit"
//! grove study new
//! grove word answer grit known
//! grove growth check
//! grove export --output ./backups/
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`storage`] | Atomic JSON state file and store construction |
//! | [`profile_cmd`] | Learner profile commands |
//! | [`words_cmd`] | Word repository commands |
//! | [`scripts_cmd`] | Shadowing script commands |
//! | [`generate_cmd`] | Applying AI-generated sentences and scripts |
//! | [`topics_cmd`] | Topic usage ledger and focus selection |
//! | [`growth_cmd`] | Daily growth tree |
//! | [`study_cmd`] | Flashcard decks |
//! | [`export`] | Backup export and import |
//! | [`stats`] | State overview |

pub mod config;
pub mod export;
pub mod generate_cmd;
pub mod growth_cmd;
pub mod profile_cmd;
pub mod scripts_cmd;
pub mod stats;
pub mod storage;
pub mod study_cmd;
pub mod topics_cmd;
pub mod words_cmd;

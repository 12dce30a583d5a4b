//! # Lexigrove CLI (`grove`)
//!
//! The `grove` binary is the primary interface for Lexigrove. Every command
//! loads the state file, applies at most a handful of store operations
//! (each committed mutation is written straight back), and exits.
//!
//! ## Usage
//!
//! ```bash
//! grove --config ./config/grove.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `grove init` | Write a config file and an empty state file |
//! | `grove profile show\|set` | Inspect or edit the learner profile |
//! | `grove word add\|bulk\|list\|status\|answer\|delete\|pending` | Manage vocabulary |
//! | `grove script list\|show\|delete\|topics` | Manage shadowing scripts |
//! | `grove generate sentences\|script` | Apply AI-generated content |
//! | `grove topics show\|focus` | Topic usage ledger |
//! | `grove growth check\|show\|debug-set` | Daily growth tree |
//! | `grove study new\|review\|stats` | Flashcard decks |
//! | `grove export` / `grove import <file>` | Backup and merge |
//! | `grove stats` | Overview of the whole state |
//!
//! ## Examples
//!
//! ```bash
//! # Start fresh with the state next to the config
//! grove init --config ./config/grove.toml
//!
//! # Add words, comma or newline separated
//! grove word bulk "serendipity, resilient"
//!
//! # Answer a flashcard
//! grove word answer resilient known
//!
//! # Feed the AI collaborator's answer back in
//! pbpaste | grove generate sentences
//!
//! # Back up and restore on another machine
//! grove export --output ./backups/
//! grove import ./backups/lexigrove_backup_2024-03-10.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexigrove::config::{self, Config};
use lexigrove::{
    export, generate_cmd, growth_cmd, profile_cmd, scripts_cmd, stats, storage, study_cmd,
    topics_cmd, words_cmd,
};
use lexigrove_core::models::{AppState, WordStatus};
use lexigrove_core::transitions::ReviewEvent;
use tracing_subscriber::EnvFilter;

/// Lexigrove CLI — a local-first vocabulary and shadowing practice store.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing config file falls back to defaults.
#[derive(Parser)]
#[command(
    name = "grove",
    about = "Lexigrove — a local-first vocabulary and shadowing practice store",
    version,
    long_about = "Lexigrove keeps a learner's profile, vocabulary with spaced review statuses, \
    shadowing scripts, a topic usage ledger and a daily growth tree in one local JSON file, \
    and merges backups from other devices without losing progress."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/grove.toml`.
    #[arg(long, global = true, default_value = "./config/grove.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Write a config file and an empty state file.
    ///
    /// Existing files are left alone, so running this twice is safe.
    Init {
        /// Where the state file should live. Defaults to `state.json` next
        /// to the config file.
        #[arg(long)]
        state: Option<PathBuf>,

        /// Offset from UTC, in minutes, at which calendar days roll over.
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        utc_offset_minutes: i32,
    },

    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that run against the loaded state file.
#[derive(Subcommand)]
enum StoreCommand {
    /// Inspect or edit the learner profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage vocabulary words.
    Word {
        #[command(subcommand)]
        action: WordAction,
    },

    /// Manage shadowing scripts.
    Script {
        #[command(subcommand)]
        action: ScriptAction,
    },

    /// Apply content produced by the AI collaborator.
    ///
    /// Reads the collaborator's JSON answer from `--file` or stdin.
    Generate {
        #[command(subcommand)]
        kind: GenerateKind,
    },

    /// Topic usage ledger and what to focus on next.
    Topics {
        #[command(subcommand)]
        action: TopicsAction,
    },

    /// Daily growth tree.
    Growth {
        #[command(subcommand)]
        action: GrowthAction,
    },

    /// Flashcard decks.
    Study {
        #[command(subcommand)]
        action: StudyAction,
    },

    /// Export a JSON backup (profile, words, topic ledger, growth).
    Export {
        /// Output file or directory. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Merge a JSON backup into the current state.
    Import {
        /// Backup file written by `grove export`.
        file: PathBuf,
    },

    /// Show an overview of the whole state.
    Stats,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print every profile field.
    Show,
    /// Set one field by name (`hobbies`, `additionalContext`, `level`, `tone`, …).
    Set { field: String, value: String },
}

#[derive(Subcommand)]
enum WordAction {
    /// Add one word.
    Add { word: String },
    /// Add many words, comma or newline separated.
    Bulk {
        /// Inline list, e.g. "grit, summit".
        words: Option<String>,
        /// Read the list from a file.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List words, optionally only one status.
    List {
        #[arg(long)]
        status: Option<WordStatus>,
    },
    /// Set a word's status directly (`new`, `learning`, `review`, `mastered`).
    Status { word: String, status: WordStatus },
    /// Record a flashcard answer (`known`, `forgot`, `cycle`).
    Answer { word: String, event: ReviewEvent },
    /// Delete a word by id or text.
    Delete { word: String },
    /// List words still waiting for a generated sentence.
    Pending,
}

#[derive(Subcommand)]
enum ScriptAction {
    /// List scripts, newest first.
    List {
        /// Print content and translation too.
        #[arg(long)]
        full: bool,
    },
    /// Print one script.
    Show {
        id: String,
        /// Number the content sentence by sentence.
        #[arg(long)]
        step: bool,
    },
    /// Delete a script by id.
    Delete { id: String },
    /// Topics of the newest scripts.
    Topics {
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
}

#[derive(Subcommand)]
enum GenerateKind {
    /// Apply generated example sentences to pending words.
    Sentences {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Save a generated shadowing script.
    Script {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TopicsAction {
    /// Usage count per profile field.
    Show,
    /// Fields to focus on and avoid next.
    Focus,
}

#[derive(Subcommand)]
enum GrowthAction {
    /// Record today's activity.
    Check,
    /// Print the current tree.
    Show,
    /// Overwrite growth state to try out decay and maturity.
    DebugSet {
        #[arg(long)]
        stage: u32,
        #[arg(long, default_value_t = 0)]
        total_trees: u32,
        #[arg(long, default_value_t = 0)]
        days_ago: i64,
    },
}

#[derive(Subcommand)]
enum StudyAction {
    /// Words never studied.
    New {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Learning and review words, least recently reviewed first.
    Review {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Counts per status.
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_init(config_path: &Path, state: Option<PathBuf>, utc_offset_minutes: i32) -> Result<()> {
    let cfg = if config_path.exists() {
        println!("Config already exists: {}", config_path.display());
        config::load_config(config_path)?
    } else {
        let dir = match config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut cfg = Config::minimal();
        cfg.storage.path = state.unwrap_or_else(|| dir.join("state.json"));
        cfg.growth.utc_offset_minutes = utc_offset_minutes;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        std::fs::write(config_path, cfg.to_toml()?)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        // Validate what we just wrote.
        let cfg = config::load_config(config_path)?;
        println!("Wrote config: {}", config_path.display());
        cfg
    };

    if cfg.storage.path.exists() {
        println!("State already exists: {}", cfg.storage.path.display());
    } else {
        storage::write_state(&cfg.storage.path, &AppState::default())?;
        println!("Created state: {}", cfg.storage.path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Init writes the config, so it cannot read it first.
        Commands::Init {
            state,
            utc_offset_minutes,
        } => {
            init_tracing("warn");
            run_init(&cli.config, state, utc_offset_minutes)
        }
        Commands::Store(command) => run_store_command(&cli.config, command),
    }
}

fn run_store_command(config_path: &Path, command: StoreCommand) -> Result<()> {
    let cfg = config::load_or_minimal(config_path)?;
    init_tracing(&cfg.logging.filter);
    let mut store = storage::open_store(&cfg)?;
    let deck_size = cfg.study.deck_size;

    match command {
        StoreCommand::Profile { action } => match action {
            ProfileAction::Show => profile_cmd::run_show(&store)?,
            ProfileAction::Set { field, value } => {
                profile_cmd::run_set(&mut store, &field, &value)?
            }
        },
        StoreCommand::Word { action } => match action {
            WordAction::Add { word } => words_cmd::run_add(&mut store, &word)?,
            WordAction::Bulk { words, file } => {
                words_cmd::run_bulk(&mut store, words.as_deref(), file.as_deref())?
            }
            WordAction::List { status } => words_cmd::run_list(&store, status)?,
            WordAction::Status { word, status } => {
                words_cmd::run_status(&mut store, &word, status)?
            }
            WordAction::Answer { word, event } => {
                words_cmd::run_answer(&mut store, &word, event)?
            }
            WordAction::Delete { word } => words_cmd::run_delete(&mut store, &word)?,
            WordAction::Pending => words_cmd::run_pending(&store)?,
        },
        StoreCommand::Script { action } => match action {
            ScriptAction::List { full } => scripts_cmd::run_list(&store, full)?,
            ScriptAction::Show { id, step } => scripts_cmd::run_show(&store, &id, step)?,
            ScriptAction::Delete { id } => scripts_cmd::run_delete(&mut store, &id)?,
            ScriptAction::Topics { count } => scripts_cmd::run_topics(&store, count)?,
        },
        StoreCommand::Generate { kind } => match kind {
            GenerateKind::Sentences { file } => {
                generate_cmd::run_sentences(&mut store, file.as_deref())?
            }
            GenerateKind::Script { file } => generate_cmd::run_script(&mut store, file.as_deref())?,
        },
        StoreCommand::Topics { action } => match action {
            TopicsAction::Show => topics_cmd::run_show(&store)?,
            TopicsAction::Focus => topics_cmd::run_focus(&store)?,
        },
        StoreCommand::Growth { action } => match action {
            GrowthAction::Check => growth_cmd::run_check(&mut store)?,
            GrowthAction::Show => growth_cmd::run_show(&store)?,
            GrowthAction::DebugSet {
                stage,
                total_trees,
                days_ago,
            } => growth_cmd::run_debug_set(&mut store, stage, total_trees, days_ago)?,
        },
        StoreCommand::Study { action } => match action {
            StudyAction::New { limit } => {
                study_cmd::run_new(&store, limit.unwrap_or(deck_size))?
            }
            StudyAction::Review { limit } => {
                study_cmd::run_review(&store, limit.unwrap_or(deck_size))?
            }
            StudyAction::Stats { json } => study_cmd::run_stats(&store, json)?,
        },
        StoreCommand::Export { output } => export::run_export(&store, output.as_deref())?,
        StoreCommand::Import { file } => export::run_import(&mut store, &file)?,
        StoreCommand::Stats => {
            let now = chrono::Utc::now().timestamp_millis();
            stats::run_stats(&cfg, &store, now)?
        }
    }

    Ok(())
}

// File: src/cli.rs
//! Startup shared by the binaries: flags, logging, config and storage.

use crate::config::GameConfig;
use crate::core::engine::Trainer;
use crate::core::vocab::Vocabulary;
use crate::error::{ConfigError, VocabError};
use crate::persistence::{FileStorage, MemoryMarker};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "Vocab Match")]
#[command(about = "Match Spanish words to their emoji and build up mastery")]
pub struct Args {
    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where profiles and preferences are saved
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// JSON vocabulary file (built-in Spanish catalog when omitted)
    #[arg(short, long)]
    pub vocab: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Logs go to stderr; `RUST_LOG` wins over `--debug`.
pub fn init_logging(debug: bool) {
    let default = if debug { "match_core=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

impl Args {
    /// The config file (if any) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<GameConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if let Some(vocab) = &self.vocab {
            config.vocab_path = Some(vocab.clone());
        }
        Ok(config)
    }
}

pub fn load_vocabulary(config: &GameConfig) -> Result<Vocabulary, VocabError> {
    match &config.vocab_path {
        Some(path) => Vocabulary::from_json_file(path),
        None => Ok(Vocabulary::builtin()),
    }
}

/// Profiles come from `data_path`; the session marker is in-memory, so every
/// launch starts at the login screen.
pub fn open_trainer(config: &GameConfig, vocabulary: Vocabulary) -> Trainer<FileStorage, MemoryMarker> {
    let storage = FileStorage::open(&config.data_path);
    info!(path = %storage.path().display(), words = vocabulary.len(), "trainer ready");
    Trainer::new(config, storage, MemoryMarker::new(), vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from(["vocab_match", "--data", "/tmp/x.bin", "--vocab", "v.json"]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/x.bin"));
        assert_eq!(config.vocab_path, Some(PathBuf::from("v.json")));
    }

    #[test]
    fn builtin_vocabulary_by_default() {
        let v = load_vocabulary(&GameConfig::default()).unwrap();
        assert!(!v.is_empty());
    }

    #[test]
    fn reopened_trainer_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig { data_path: dir.path().join("profile.bin"), ..GameConfig::default() };

        let mut first = open_trainer(&config, Vocabulary::builtin());
        first.login("Mina", "1982").unwrap();
        first.logout().unwrap();

        let mut second = open_trainer(&config, Vocabulary::builtin());
        assert!(second.restore_session().is_none());
        assert!(second.current_user().is_none());
        assert!(second.users().contains("Mina"));
    }
}

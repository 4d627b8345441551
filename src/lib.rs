// src/lib.rs

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod learning;
pub mod persistence;

pub use crate::core::engine::{RoundView, Theme, Trainer};
pub use crate::core::session::{Effect, InputEvent, Phase, SessionState};
pub use crate::core::types::{SoundKind, UserProfile, VocabEntry};
pub use crate::core::vocab::Vocabulary;
pub use crate::error::{GameError, GameResult};

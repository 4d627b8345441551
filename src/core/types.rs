// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A word is identified by its spelling.
pub type Word = String;

/// A single catalog item: the word to learn and the emoji that pictures it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: Word,
    pub emoji: String,
}

impl VocabEntry {
    pub fn new(word: &str, emoji: &str) -> Self {
        Self { word: word.to_string(), emoji: emoji.to_string() }
    }
}

/// Everything remembered about one player between runs.
/// This is the "value" in the persisted user map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    /// Empty for open accounts, which accept any PIN.
    pub pin: String,
    /// Number of error-free first matches, ever.
    pub score: u32,
    /// Error-free matches per word, capped at the mastery ceiling.
    pub mastered: BTreeMap<Word, u32>,
    /// Words of the most recently started round, in round order.
    pub last_words: Vec<Word>,
    /// Recently credited words still below the ceiling, newest first.
    pub last_correct: Vec<Word>,
}

impl UserProfile {
    pub fn with_pin(pin: &str) -> Self {
        Self { pin: pin.to_string(), ..Self::default() }
    }

    pub fn mastery(&self, word: &str) -> u32 {
        self.mastered.get(word).copied().unwrap_or(0)
    }

    pub fn is_retired(&self, word: &str, cap: u32) -> bool {
        self.mastery(word) >= cap
    }
}

/// Which remembered list seeds the carry-over of the next round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrySource {
    /// Every word of the previous round.
    #[default]
    LastWords,
    /// Only the most recently credited words.
    LastCorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Correct,
    Wrong,
    Finish,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_json_uses_stored_field_names() {
        let mut p = UserProfile::with_pin("1984");
        p.last_words = vec!["sol".into()];
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"lastWords\""));
        assert!(json.contains("\"lastCorrect\""));
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let p: UserProfile = serde_json::from_str(r#"{"pin":"1","score":4}"#).unwrap();
        assert_eq!(p.score, 4);
        assert!(p.mastered.is_empty());
        assert!(p.last_correct.is_empty());
    }

    #[test]
    fn retired_at_cap() {
        let mut p = UserProfile::default();
        p.mastered.insert("sol".into(), 10);
        assert!(p.is_retired("sol", 10));
        assert!(!p.is_retired("luna", 10));
    }
}

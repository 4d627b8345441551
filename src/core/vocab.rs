// File: src/core/vocab.rs
use crate::core::types::VocabEntry;
use crate::error::VocabError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const BUILTIN: &[(&str, &str)] = &[
    ("manzana", "🍎"), ("coche", "🚗"), ("perro", "🐶"), ("sol", "🌞"),
    ("gato", "🐱"), ("casa", "🏠"), ("libro", "📚"), ("agua", "💧"),
    ("árbol", "🌳"), ("luna", "🌙"), ("pez", "🐟"), ("flor", "🌸"),
    ("pan", "🍞"), ("leche", "🥛"), ("tren", "🚆"), ("avión", "✈️"),
    ("estrella", "⭐"), ("corazón", "❤️"), ("pelota", "⚽"), ("queso", "🧀"),
];

/// The read-only catalog every round is drawn from.
/// Never empty, and each word appears once.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<VocabEntry>,
}

impl Vocabulary {
    pub fn new(entries: Vec<VocabEntry>) -> Result<Self, VocabError> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.word.trim().is_empty() {
                continue;
            }
            if seen.insert(entry.word.clone()) {
                unique.push(entry);
            } else {
                warn!(word = %entry.word, "duplicate vocabulary entry ignored");
            }
        }
        if unique.is_empty() {
            return Err(VocabError::Unavailable("catalog is empty".into()));
        }
        Ok(Self { entries: unique })
    }

    /// The Spanish catalog shipped with the game.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.iter().map(|&(w, e)| VocabEntry::new(w, e)).collect(),
        }
    }

    /// Reads a JSON array of `{ "word", "emoji" }` objects.
    pub fn from_json_file(path: &Path) -> Result<Self, VocabError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| VocabError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let entries: Vec<VocabEntry> = serde_json::from_str(&raw)
            .map_err(|e| VocabError::Unavailable(format!("{}: {}", path.display(), e)))?;
        debug!(count = entries.len(), path = %path.display(), "vocabulary file read");
        Self::new(entries)
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn get(&self, word: &str) -> Option<&VocabEntry> {
        self.entries.iter().find(|e| e.word == word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// File: src/learning.rs
use crate::core::types::UserProfile;

/// Applies credited matches to a profile.
pub struct LearningEngine {
    mastery_cap: u32,
}

impl LearningEngine {
    pub fn new(mastery_cap: u32) -> Self {
        Self { mastery_cap }
    }

    /// One error-free match of `word`. Returns the word's new mastery count.
    ///
    /// Score always moves; mastery stops at the cap, and a word that reaches
    /// the cap leaves the last-correct rotation.
    pub fn credit(&self, profile: &mut UserProfile, word: &str) -> u32 {
        profile.score += 1;

        let count = profile.mastered.entry(word.to_string()).or_insert(0);
        *count = (*count + 1).min(self.mastery_cap);
        let updated = *count;

        profile.last_correct.retain(|w| w != word);
        if updated < self.mastery_cap {
            profile.last_correct.insert(0, word.to_string());
        }
        updated
    }
}

// File: src/core/selector.rs
use crate::config::RoundConfig;
use crate::core::types::{CarrySource, UserProfile, VocabEntry};
use crate::core::vocab::Vocabulary;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Picks the words of the next round.
///
/// Up to `carry_limit` words of the remembered list come first, in their
/// previous order, as long as they are not retired yet. The rest of the
/// round is drawn uniformly from the remaining eligible words.
#[derive(Debug, Clone, Copy)]
pub struct RoundSelector {
    config: RoundConfig,
}

impl RoundSelector {
    pub fn new(config: RoundConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Entries the profile has not retired yet, in catalog order.
    pub fn pool<'v>(&self, profile: &UserProfile, vocabulary: &'v Vocabulary) -> Vec<&'v VocabEntry> {
        vocabulary
            .entries()
            .iter()
            .filter(|e| !profile.is_retired(&e.word, self.config.mastery_cap))
            .collect()
    }

    /// Builds the round and records it as the profile's `last_words`.
    /// Returns an empty list when every word is retired.
    pub fn select_round<R: Rng + ?Sized>(
        &self,
        profile: &mut UserProfile,
        vocabulary: &Vocabulary,
        rng: &mut R,
    ) -> Vec<VocabEntry> {
        let mut pool = self.pool(profile, vocabulary);
        if pool.is_empty() {
            debug!("no eligible words left");
            return Vec::new();
        }

        let remembered = match self.config.carry_source {
            CarrySource::LastWords => &profile.last_words,
            CarrySource::LastCorrect => &profile.last_correct,
        };

        let mut round: Vec<VocabEntry> = Vec::with_capacity(self.config.round_size);
        for word in remembered {
            if round.len() == self.config.carry_limit {
                break;
            }
            if round.iter().any(|e| &e.word == word) {
                continue;
            }
            if let Some(pos) = pool.iter().position(|e| &e.word == word) {
                round.push(pool.remove(pos).clone());
            }
        }
        let carried = round.len();

        pool.shuffle(rng);
        let need = self.config.round_size.saturating_sub(carried);
        round.extend(pool.into_iter().take(need).cloned());

        debug!(carried, fresh = round.len() - carried, "round selected");
        profile.last_words = round.iter().map(|e| e.word.clone()).collect();
        round
    }
}

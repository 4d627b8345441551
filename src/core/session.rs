// File: src/core/session.rs
use crate::core::types::{SoundKind, VocabEntry, Word};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingEmojiSelection,
    EmojiSelected,
    RoundComplete,
}

/// Clicks coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    EmojiClicked(Word),
    WordClicked(Word),
}

/// What the front-end (or the engine) has to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Pronounce(Word),
    Sound(SoundKind),
    /// Emoji tile selected as the pending guess target.
    Selected(Word),
    /// Pair matched; `credited` is false when the word was missed earlier in the round.
    Matched { word: Word, credited: bool },
    /// Word tile picked for the wrong emoji.
    Incorrect(Word),
    /// Score and mastery must be bumped for this word.
    Credit(Word),
    Progress { matched: usize, total: usize },
    RoundComplete,
    /// Credit was applied in memory but could not be written to storage.
    SaveFailed(String),
}

/// The in-progress round. Transitions never touch a profile; credit leaves
/// through `Effect::Credit` and is applied by the caller.
#[derive(Debug, Clone)]
pub struct SessionState {
    round: Vec<VocabEntry>,
    word_order: Vec<Word>,
    matched: BTreeSet<Word>,
    errors: BTreeSet<Word>,
    credited: BTreeSet<Word>,
    pending: Option<Word>,
}

impl SessionState {
    /// Starts a round. Word tiles are shuffled once here so that renders
    /// do not reorder them.
    pub fn new<R: Rng + ?Sized>(round: Vec<VocabEntry>, rng: &mut R) -> Self {
        let mut word_order: Vec<Word> = round.iter().map(|e| e.word.clone()).collect();
        word_order.shuffle(rng);
        Self {
            round,
            word_order,
            matched: BTreeSet::new(),
            errors: BTreeSet::new(),
            credited: BTreeSet::new(),
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.round.is_empty() && self.matched.len() == self.round.len() {
            Phase::RoundComplete
        } else if self.pending.is_some() {
            Phase::EmojiSelected
        } else {
            Phase::AwaitingEmojiSelection
        }
    }

    pub fn handle(&mut self, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::EmojiClicked(word) => self.select_emoji(&word),
            InputEvent::WordClicked(word) => self.select_word(&word),
        }
    }

    pub fn select_emoji(&mut self, word: &str) -> Vec<Effect> {
        if !self.contains(word) {
            return vec![];
        }
        if self.matched.contains(word) {
            return vec![Effect::Pronounce(word.to_string())];
        }
        self.pending = Some(word.to_string());
        vec![Effect::Selected(word.to_string()), Effect::Pronounce(word.to_string())]
    }

    pub fn select_word(&mut self, candidate: &str) -> Vec<Effect> {
        if self.phase() == Phase::RoundComplete || !self.contains(candidate) {
            return vec![];
        }
        let Some(target) = self.pending.clone() else {
            return vec![];
        };

        if target != candidate {
            self.errors.insert(candidate.to_string());
            return vec![Effect::Incorrect(candidate.to_string()), Effect::Sound(SoundKind::Wrong)];
        }

        self.pending = None;
        self.on_correct(target)
    }

    fn on_correct(&mut self, word: Word) -> Vec<Effect> {
        self.matched.insert(word.clone());
        let credited = !self.errors.contains(&word) && self.credited.insert(word.clone());

        let mut effects = Vec::with_capacity(5);
        if credited {
            effects.push(Effect::Credit(word.clone()));
        }
        effects.push(Effect::Matched { word, credited });
        effects.push(Effect::Sound(SoundKind::Correct));
        effects.push(Effect::Progress { matched: self.matched.len(), total: self.round.len() });
        if self.phase() == Phase::RoundComplete {
            effects.push(Effect::Sound(SoundKind::Finish));
            effects.push(Effect::RoundComplete);
        }
        effects
    }

    fn contains(&self, word: &str) -> bool {
        self.round.iter().any(|e| e.word == word)
    }

    pub fn round(&self) -> &[VocabEntry] {
        &self.round
    }

    pub fn word_order(&self) -> &[Word] {
        &self.word_order
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_matched(&self, word: &str) -> bool {
        self.matched.contains(word)
    }

    pub fn matched(&self) -> &BTreeSet<Word> {
        &self.matched
    }

    pub fn errors(&self) -> &BTreeSet<Word> {
        &self.errors
    }

    /// Fraction of the round matched, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.round.is_empty() {
            return 0.0;
        }
        self.matched.len() as f32 / self.round.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(words: &[&str]) -> SessionState {
        let round = words.iter().map(|w| VocabEntry::new(w, "·")).collect();
        SessionState::new(round, &mut StdRng::seed_from_u64(5))
    }

    fn emoji(w: &str) -> InputEvent {
        InputEvent::EmojiClicked(w.into())
    }

    fn word(w: &str) -> InputEvent {
        InputEvent::WordClicked(w.into())
    }

    #[test]
    fn starts_awaiting_selection() {
        let s = session(&["sol", "coche"]);
        assert_eq!(s.phase(), Phase::AwaitingEmojiSelection);
        assert!(s.matched().is_empty());
        assert_eq!(s.pending(), None);
    }

    #[test]
    fn word_without_pending_emoji_is_noop() {
        let mut s = session(&["sol", "coche"]);
        assert!(s.handle(word("sol")).is_empty());
        assert!(s.errors().is_empty());
    }

    #[test]
    fn clean_match_is_credited() {
        let mut s = session(&["sol", "coche"]);
        s.handle(emoji("sol"));
        let effects = s.handle(word("sol"));
        assert!(effects.contains(&Effect::Credit("sol".into())));
        assert!(effects.contains(&Effect::Matched { word: "sol".into(), credited: true }));
        assert_eq!(s.phase(), Phase::AwaitingEmojiSelection);
    }

    #[test]
    fn errors_are_charged_to_the_guessed_word() {
        let mut s = session(&["perro", "gato"]);
        s.handle(emoji("perro"));
        let wrong = s.handle(word("gato"));
        assert_eq!(wrong, vec![Effect::Incorrect("gato".into()), Effect::Sound(SoundKind::Wrong)]);
        assert_eq!(s.phase(), Phase::EmojiSelected);
        assert_eq!(s.pending(), Some("perro"));

        // the error is recorded against the guessed word, so perro stays creditable
        let right = s.handle(word("perro"));
        assert!(right.contains(&Effect::Credit("perro".into())));

        s.handle(emoji("gato"));
        let late = s.handle(word("gato"));
        assert!(!late.iter().any(|e| matches!(e, Effect::Credit(_))));
        assert!(s.is_matched("gato"));
    }

    #[test]
    fn word_guessed_wrong_earns_no_credit() {
        let mut s = session(&["perro", "sol"]);
        s.handle(emoji("sol"));
        s.handle(word("perro"));
        s.handle(emoji("perro"));
        let effects = s.handle(word("perro"));
        assert!(effects.contains(&Effect::Matched { word: "perro".into(), credited: false }));
        assert!(!effects.contains(&Effect::Credit("perro".into())));
        assert!(s.is_matched("perro"));
    }

    #[test]
    fn reselecting_replaces_pending_without_penalty() {
        let mut s = session(&["sol", "coche"]);
        s.handle(emoji("sol"));
        s.handle(emoji("coche"));
        assert_eq!(s.pending(), Some("coche"));
        assert!(s.errors().is_empty());
    }

    #[test]
    fn matched_emoji_replays_pronunciation() {
        let mut s = session(&["sol", "coche"]);
        s.handle(emoji("sol"));
        s.handle(word("sol"));
        let effects = s.handle(emoji("sol"));
        assert_eq!(effects, vec![Effect::Pronounce("sol".into())]);
        assert_eq!(s.phase(), Phase::AwaitingEmojiSelection);
    }

    #[test]
    fn completes_exactly_when_all_matched() {
        let mut s = session(&["sol", "coche"]);
        s.handle(emoji("sol"));
        s.handle(word("coche"));
        s.handle(word("coche"));
        s.handle(word("sol"));
        assert_ne!(s.phase(), Phase::RoundComplete);

        s.handle(emoji("coche"));
        s.handle(word("sol"));
        let effects = s.handle(word("coche"));
        assert_eq!(s.phase(), Phase::RoundComplete);
        assert!(effects.contains(&Effect::RoundComplete));
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn unknown_words_are_ignored() {
        let mut s = session(&["sol"]);
        assert!(s.handle(emoji("luna")).is_empty());
        s.handle(emoji("sol"));
        assert!(s.handle(word("luna")).is_empty());
        assert!(s.errors().is_empty());
    }

    #[test]
    fn word_order_is_a_permutation_of_the_round() {
        let s = session(&["a", "b", "c", "d", "e"]);
        let mut order = s.word_order().to_vec();
        order.sort();
        assert_eq!(order, vec!["a", "b", "c", "d", "e"]);
    }
}

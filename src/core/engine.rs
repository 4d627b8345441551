use crate::config::GameConfig;
use crate::core::selector::RoundSelector;
use crate::core::session::{Effect, InputEvent, Phase, SessionState};
use crate::core::types::{UserProfile, VocabEntry, Word};
use crate::core::users::UserStore;
use crate::core::vocab::Vocabulary;
use crate::error::{GameError, GameResult};
use crate::learning::LearningEngine;
use crate::persistence::{DurableStorage, SessionMarker, THEME_KEY};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

const GOOD_LUCK: &[&str] = &["¡Listo, pixelero! 🎮", "¡A por los puntos! ⭐", "¡Tú puedes! 💪"];
const WELL_DONE: &[&str] = &["¡Nivel completado! ✅", "¡Victoria retro! 🎉", "¡Súper 8-bit! 🌟"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn parse(s: &str) -> Self {
        if s == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// One tile of the round as the front-end draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub word: Word,
    pub emoji: String,
    pub matched: bool,
    pub selected: bool,
}

/// Snapshot of the round for rendering.
#[derive(Debug, Clone)]
pub struct RoundView {
    /// Emoji column, in round order.
    pub emojis: Vec<Tile>,
    /// Word column, shuffled once per round.
    pub words: Vec<Tile>,
    pub progress: f32,
    pub score: u32,
    pub phase: Phase,
}

/// What a started round hands back to the front-end.
#[derive(Debug, Clone)]
pub struct RoundStart {
    pub words: Vec<Word>,
    pub message: &'static str,
}

/// The game as the UI drives it: accounts, rounds and scoring.
///
/// Every change to a profile is persisted before the call returns.
pub struct Trainer<S: DurableStorage, M: SessionMarker> {
    users: UserStore<S>,
    marker: M,
    vocabulary: Vocabulary,
    selector: RoundSelector,
    learning: LearningEngine,
    rng: StdRng,
    current_user: Option<String>,
    session: Option<SessionState>,
}

impl<S: DurableStorage, M: SessionMarker> Trainer<S, M> {
    /// Builds the trainer and merges saved profiles into the presets.
    pub fn new(config: &GameConfig, storage: S, marker: M, vocabulary: Vocabulary) -> Self {
        Self::with_rng(config, storage, marker, vocabulary, StdRng::from_os_rng())
    }

    /// Same as `new` with a caller-supplied generator, for reproducible rounds.
    pub fn with_rng(config: &GameConfig, storage: S, marker: M, vocabulary: Vocabulary, rng: StdRng) -> Self {
        let mut users = if config.seed_presets {
            UserStore::with_presets(storage)
        } else {
            UserStore::new(storage)
        };
        users.load();
        Self {
            users,
            marker,
            vocabulary,
            selector: RoundSelector::new(config.round),
            learning: LearningEngine::new(config.round.mastery_cap),
            rng,
            current_user: None,
            session: None,
        }
    }

    /// Logs back in whoever the session marker remembers, without a PIN.
    pub fn restore_session(&mut self) -> Option<&str> {
        let name = self.marker.current()?;
        if !self.users.contains(&name) {
            self.marker.clear();
            return None;
        }
        debug!(user = %name, "session restored");
        self.current_user = Some(name);
        self.current_user.as_deref()
    }

    #[instrument(skip(self, pin))]
    pub fn login(&mut self, name: &str, pin: &str) -> GameResult<()> {
        let name = name.trim();
        self.users.authenticate(name, pin)?;
        self.marker.set(name);
        self.current_user = Some(name.to_string());
        self.session = None;
        info!("logged in");
        Ok(())
    }

    pub fn register(&mut self, name: &str, pin: &str) -> GameResult<()> {
        self.users.register(name, pin)?;
        Ok(())
    }

    /// Saves and forgets the current player. Any round in progress is dropped.
    pub fn logout(&mut self) -> GameResult<()> {
        self.users.persist()?;
        self.marker.clear();
        if let Some(name) = self.current_user.take() {
            info!(user = %name, "logged out");
        }
        self.session = None;
        Ok(())
    }

    /// Selects and starts the next round for the current player.
    /// The new rotation is persisted before the round is shown.
    pub fn start_round(&mut self) -> GameResult<RoundStart> {
        let name = self.current_user.clone().ok_or(GameError::NotLoggedIn)?;
        let profile = self.users.get_mut(&name).ok_or(GameError::NotLoggedIn)?;

        let round = self.selector.select_round(profile, &self.vocabulary, &mut self.rng);
        if round.is_empty() {
            return Err(GameError::NoEligibleWords);
        }
        self.users.persist()?;

        let words: Vec<Word> = round.iter().map(|e| e.word.clone()).collect();
        info!(user = %name, size = words.len(), "round started");
        self.session = Some(SessionState::new(round, &mut self.rng));
        let message = GOOD_LUCK.choose(&mut self.rng).copied().unwrap_or_default();
        Ok(RoundStart { words, message })
    }

    /// Feeds a click into the round and applies any credit it earns.
    ///
    /// The profile is saved once after all credit is applied. A failed save
    /// does not drop the transition: it is reported as `Effect::SaveFailed`
    /// at the end of the returned effects.
    pub fn handle(&mut self, event: InputEvent) -> GameResult<Vec<Effect>> {
        let name = self.current_user.clone().ok_or(GameError::NotLoggedIn)?;
        let session = self.session.as_mut().ok_or(GameError::NoActiveRound)?;
        let mut effects = session.handle(event);

        let mut credited = false;
        for effect in &effects {
            match effect {
                Effect::Credit(word) => {
                    if let Some(profile) = self.users.get_mut(&name) {
                        let mastery = self.learning.credit(profile, word);
                        debug!(user = %name, word = %word, mastery, score = profile.score, "credit applied");
                        credited = true;
                    }
                }
                Effect::RoundComplete => info!(user = %name, "round complete"),
                _ => {}
            }
        }

        if credited {
            if let Err(e) = self.users.persist() {
                warn!(user = %name, error = %e, "could not save credit");
                effects.push(Effect::SaveFailed(e.to_string()));
            }
        }
        Ok(effects)
    }

    pub fn emoji_clicked(&mut self, word: &str) -> GameResult<Vec<Effect>> {
        self.handle(InputEvent::EmojiClicked(word.to_string()))
    }

    pub fn word_clicked(&mut self, word: &str) -> GameResult<Vec<Effect>> {
        self.handle(InputEvent::WordClicked(word.to_string()))
    }

    /// Leaves the current round without further saving.
    pub fn abandon_round(&mut self) {
        if self.session.take().is_some() {
            debug!("round abandoned");
        }
    }

    pub fn round_view(&self) -> Option<RoundView> {
        let session = self.session.as_ref()?;
        let emoji_of = |word: &str| {
            session
                .round()
                .iter()
                .find(|e| e.word == word)
                .map(|e| e.emoji.clone())
                .unwrap_or_default()
        };
        let tile = |entry: &VocabEntry| Tile {
            word: entry.word.clone(),
            emoji: entry.emoji.clone(),
            matched: session.is_matched(&entry.word),
            selected: session.pending() == Some(entry.word.as_str()),
        };
        Some(RoundView {
            emojis: session.round().iter().map(tile).collect(),
            words: session
                .word_order()
                .iter()
                .map(|w| Tile {
                    word: w.clone(),
                    emoji: emoji_of(w),
                    matched: session.is_matched(w),
                    selected: false,
                })
                .collect(),
            progress: session.progress(),
            score: self.profile().map(|p| p.score).unwrap_or(0),
            phase: session.phase(),
        })
    }

    pub fn well_done(&mut self) -> &'static str {
        WELL_DONE.choose(&mut self.rng).copied().unwrap_or_default()
    }

    pub fn theme(&self) -> Theme {
        self.users
            .storage()
            .get(THEME_KEY)
            .map(|t| Theme::parse(&t))
            .unwrap_or(Theme::Light)
    }

    pub fn toggle_theme(&mut self) -> GameResult<Theme> {
        let next = match self.theme() {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.users.storage_mut().set(THEME_KEY, next.as_str())?;
        Ok(next)
    }

    pub fn leaderboard(&self) -> Vec<(String, u32)> {
        self.users.leaderboard()
    }

    pub fn current_user(&self) -> Option<&str> {
        self.current_user.as_deref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.users.get(self.current_user.as_deref()?)
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn users(&self) -> &UserStore<S> {
        &self.users
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{SoundKind, VocabEntry};
    use crate::error::StorageError;
    use crate::persistence::{MemoryMarker, MemoryStorage};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Memory storage whose writes can be switched to fail.
    struct FlakyStorage {
        inner: MemoryStorage,
        failing: Rc<Cell<bool>>,
    }

    impl DurableStorage for FlakyStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.failing.get() {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }
    }

    fn trainer() -> Trainer<MemoryStorage, MemoryMarker> {
        Trainer::with_rng(
            &GameConfig::default(),
            MemoryStorage::new(),
            MemoryMarker::new(),
            Vocabulary::builtin(),
            StdRng::seed_from_u64(17),
        )
    }

    #[test]
    fn start_requires_login() {
        let mut t = trainer();
        assert!(matches!(t.start_round(), Err(GameError::NotLoggedIn)));
    }

    #[test]
    fn clicks_require_a_round() {
        let mut t = trainer();
        t.login("Tony", "1984").unwrap();
        assert!(matches!(t.emoji_clicked("sol"), Err(GameError::NoActiveRound)));
    }

    #[test]
    fn clean_round_scores_every_word() {
        let mut t = trainer();
        t.login("Mina", "1982").unwrap();
        let start = t.start_round().unwrap();
        assert_eq!(start.words.len(), 5);
        let mut last = vec![];
        for w in &start.words {
            t.emoji_clicked(w).unwrap();
            last = t.word_clicked(w).unwrap();
        }
        assert!(last.contains(&Effect::RoundComplete));
        assert!(last.contains(&Effect::Sound(SoundKind::Finish)));
        let mina = t.profile().unwrap();
        assert_eq!(mina.score, 5);
        assert!(start.words.iter().all(|w| mina.mastery(w) == 1));
    }

    #[test]
    fn round_start_persists_rotation() {
        let mut t = trainer();
        t.login("Kaito", "2015").unwrap();
        let start = t.start_round().unwrap();
        let raw = t.users().storage().get(crate::persistence::USERS_KEY).unwrap();
        for w in &start.words {
            assert!(raw.contains(w.as_str()));
        }
    }

    #[test]
    fn exhausted_vocabulary_reports_no_eligible_words() {
        let mut t = trainer();
        t.login("Tony", "1984").unwrap();
        let words: Vec<String> = t.vocabulary().entries().iter().map(|e| e.word.clone()).collect();
        let tony = t.users.get_mut("Tony").unwrap();
        for w in words {
            tony.mastered.insert(w, 10);
        }
        assert!(matches!(t.start_round(), Err(GameError::NoEligibleWords)));
    }

    #[test]
    fn failed_save_still_reports_completion() {
        let failing = Rc::new(Cell::new(false));
        let storage = FlakyStorage { inner: MemoryStorage::new(), failing: failing.clone() };
        let vocab = Vocabulary::new(vec![VocabEntry::new("sol", "🌞")]).unwrap();
        let mut t = Trainer::with_rng(&GameConfig::default(), storage, MemoryMarker::new(), vocab, StdRng::seed_from_u64(2));
        t.login("Tony", "1984").unwrap();
        t.start_round().unwrap();
        t.emoji_clicked("sol").unwrap();

        failing.set(true);
        let effects = t.word_clicked("sol").unwrap();
        assert!(effects.contains(&Effect::Matched { word: "sol".into(), credited: true }));
        assert!(effects.contains(&Effect::RoundComplete));
        assert!(matches!(effects.last(), Some(Effect::SaveFailed(_))));
        assert_eq!(t.profile().unwrap().score, 1);
        assert_eq!(t.session().unwrap().phase(), Phase::RoundComplete);
    }

    #[test]
    fn theme_toggles_and_sticks() {
        let mut t = trainer();
        assert_eq!(t.theme(), Theme::Light);
        assert_eq!(t.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(t.theme(), Theme::Dark);
    }

    #[test]
    fn marker_restores_login() {
        let mut t = trainer();
        t.login("Sorato", "2014").unwrap();
        t.current_user = None;
        assert_eq!(t.restore_session(), Some("Sorato"));
        t.logout().unwrap();
        assert_eq!(t.restore_session(), None);
    }

    #[test]
    fn view_tracks_selection_and_matches() {
        let mut t = trainer();
        t.login("Guest", "").unwrap();
        let start = t.start_round().unwrap();
        let first = &start.words[0];
        t.emoji_clicked(first).unwrap();
        let view = t.round_view().unwrap();
        assert!(view.emojis[0].selected);
        assert_eq!(view.phase, Phase::EmojiSelected);

        t.word_clicked(first).unwrap();
        let view = t.round_view().unwrap();
        assert!(view.emojis[0].matched);
        assert!(view.words.iter().any(|tile| &tile.word == first && tile.matched));
        assert!((view.progress - 0.2).abs() < f32::EPSILON);
        assert_eq!(view.score, 1);
    }
}

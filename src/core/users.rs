// File: src/core/users.rs
use crate::core::types::UserProfile;
use crate::error::{AuthError, RegisterError, StorageError};
use crate::persistence::{DurableStorage, USERS_KEY};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Stock players: an open Guest account plus the family.
pub const PRESET_USERS: &[(&str, &str)] = &[
    ("Guest", ""),
    ("Tony", "1984"),
    ("Mina", "1982"),
    ("Sorato", "2014"),
    ("Kaito", "2015"),
    ("Maria", "2019"),
];

/// All registered players, backed by an injected durable storage.
pub struct UserStore<S: DurableStorage> {
    storage: S,
    users: BTreeMap<String, UserProfile>,
}

impl<S: DurableStorage> UserStore<S> {
    /// An empty store. Nothing is read until `load` is called.
    pub fn new(storage: S) -> Self {
        Self { storage, users: BTreeMap::new() }
    }

    /// A store seeded with `PRESET_USERS`.
    pub fn with_presets(storage: S) -> Self {
        let mut store = Self::new(storage);
        for &(name, pin) in PRESET_USERS {
            store.users.insert(name.to_string(), UserProfile::with_pin(pin));
        }
        store
    }

    /// Merges the stored user map over the in-memory one: stored profiles
    /// replace matching names, everyone else keeps their current profile.
    /// Missing or malformed data counts as nothing saved.
    pub fn load(&mut self) {
        let Some(raw) = self.storage.get(USERS_KEY) else {
            debug!("no saved users");
            return;
        };
        match serde_json::from_str::<BTreeMap<String, UserProfile>>(&raw) {
            Ok(saved) => {
                debug!(count = saved.len(), "saved users loaded");
                self.users.extend(saved);
            }
            Err(e) => warn!(error = %e, "ignoring malformed user data"),
        }
    }

    /// Writes the whole user map.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.users)?;
        self.storage.set(USERS_KEY, &json)
    }

    /// Players with an empty stored PIN accept any PIN.
    pub fn authenticate(&self, name: &str, pin: &str) -> Result<&UserProfile, AuthError> {
        let (name, pin) = (name.trim(), pin.trim());
        let profile = self.users.get(name).ok_or(AuthError::UnknownUser)?;
        if !profile.pin.is_empty() && profile.pin != pin {
            return Err(AuthError::BadPin);
        }
        Ok(profile)
    }

    /// Creates a zero-valued profile and persists it.
    pub fn register(&mut self, name: &str, pin: &str) -> Result<&UserProfile, RegisterError> {
        let (name, pin) = (name.trim(), pin.trim());
        if name.is_empty() || pin.is_empty() {
            return Err(RegisterError::MissingField);
        }
        if self.users.contains_key(name) {
            return Err(RegisterError::DuplicateName);
        }
        self.users.insert(name.to_string(), UserProfile::with_pin(pin));
        if let Err(e) = self.persist() {
            warn!(error = %e, "could not save new user");
        }
        info!(user = name, "user registered");
        Ok(&self.users[name])
    }

    pub fn get(&self, name: &str) -> Option<&UserProfile> {
        self.users.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut UserProfile> {
        self.users.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    /// Players by score, highest first; ties in name order.
    pub fn leaderboard(&self) -> Vec<(String, u32)> {
        let mut board: Vec<(String, u32)> =
            self.users.iter().map(|(name, p)| (name.clone(), p.score)).collect();
        // users iterate in name order and the sort is stable
        board.sort_by_key(|&(_, score)| std::cmp::Reverse(score));
        board
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

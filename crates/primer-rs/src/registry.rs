//! The live user→prompt registry and its persistence behavior.
//!
//! The registry owns the in-memory map and the host's [`ConfigStore`]. Every
//! mutation re-serializes the full map as a JSON array of
//! `{"user_id", "prompt"}` records and writes it back through the store.
//! Persistence is fire-and-forget: an unsupported or failing save is logged
//! and the mutation still counts — callers always learn the outcome of the
//! logical operation, never of the I/O.

use crate::config::{self, KEY_USER_PROMPTS};
use crate::store::{ConfigStore, SaveOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// One persisted registry entry.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PromptRecord {
    pub user_id: String,
    pub prompt: String,
}

/// Mutable user→prompt mapping backed by the host configuration store.
pub struct PromptRegistry<S: ConfigStore> {
    prompts: HashMap<String, String>,
    store: S,
}

impl<S: ConfigStore> PromptRegistry<S> {
    /// Build the registry from the store's persisted records.
    pub fn new(store: S) -> Self {
        let prompts = config::load_user_prompts(&store);
        Self { prompts, store }
    }

    /// Number of personalized prompts.
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Read-only access to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The personalized prompt for `user_id`, if one is set.
    pub fn get(&self, user_id: &str) -> Option<&str> {
        self.prompts.get(user_id).map(String::as_str)
    }

    /// Store `text` for `user_id`, overwriting any prior value, and persist.
    ///
    /// Returns whether a prior value existed. `text` must be non-empty after
    /// trimming; the command layer guards this before calling.
    pub fn set(&mut self, user_id: &str, text: &str) -> bool {
        let prior = self
            .prompts
            .insert(user_id.to_string(), text.trim().to_string());
        self.persist();
        prior.is_some()
    }

    /// Remove the entry for `user_id`, persisting only if one existed.
    pub fn remove(&mut self, user_id: &str) -> bool {
        let existed = self.prompts.remove(user_id).is_some();
        if existed {
            self.persist();
        }
        existed
    }

    /// Serialize the full map and write it back through the store.
    ///
    /// Record order is whatever the map yields; loading only depends on set
    /// equality. Failures never reach the caller.
    fn persist(&mut self) {
        let records: Vec<PromptRecord> = self
            .prompts
            .iter()
            .map(|(user_id, prompt)| PromptRecord {
                user_id: user_id.clone(),
                prompt: prompt.clone(),
            })
            .collect();
        let serialized = match serde_json::to_string(&records) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to serialize user prompts; skipping persistence");
                return;
            }
        };
        self.store.set(KEY_USER_PROMPTS, Value::String(serialized));
        match self.store.save() {
            SaveOutcome::Saved => {
                debug!(entries = self.prompts.len(), "persisted user prompts");
            }
            SaveOutcome::Unsupported => {
                warn!("config store has no save operation; user prompts are kept in memory only");
            }
            SaveOutcome::Failed(cause) => {
                warn!(%cause, "failed to persist user prompts; keeping them in memory");
            }
        }
    }
}

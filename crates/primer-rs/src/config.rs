//! Plugin settings parsed from the host configuration store.
//!
//! All parsing is tolerant: malformed values degrade to safe defaults with a
//! log line, and [`Settings::load`] never fails. The raw config shape is
//! trusted nowhere else — everything downstream works from the typed
//! [`Settings`] built once at load time.

use crate::store::ConfigStore;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, warn};

/// Config key: whether injection applies in private chats. Default `true`.
pub const KEY_ENABLE_PRIVATE_CHAT: &str = "enable_private_chat";
/// Config key: group allow-list (JSON array of ids). Empty = all groups.
pub const KEY_ENABLED_GROUPS: &str = "enabled_groups";
/// Config key: fallback prompt for senders without a personalized one.
pub const KEY_DEFAULT_PROMPT: &str = "default_prompt";
/// Config key: `"system"` or `"user"`.
pub const KEY_INJECT_MODE: &str = "inject_mode";
/// Config key: serialized user→prompt records (JSON-array string).
pub const KEY_USER_PROMPTS: &str = "user_prompts";

// ── Inject mode ────────────────────────────────────────────────────

/// Where resolved prompt text lands in the outbound request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InjectMode {
    /// Prepend to the request's system instruction.
    #[default]
    System,
    /// Append a synthetic user message.
    User,
}

impl InjectMode {
    fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "system" => Some(InjectMode::System),
            "user" => Some(InjectMode::User),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InjectMode::System => "system",
            InjectMode::User => "user",
        }
    }
}

impl std::fmt::Display for InjectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Settings ───────────────────────────────────────────────────────

/// Typed plugin settings, immutable after load.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Whether injection applies in private chats.
    pub enable_private_chat: bool,
    /// Group allow-list. Empty means all groups are allowed.
    pub enabled_groups: HashSet<String>,
    /// Fallback prompt for senders with no personalized entry.
    pub default_prompt: Option<String>,
    /// Where resolved text lands in the request.
    pub inject_mode: InjectMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_private_chat: true,
            enabled_groups: HashSet::new(),
            default_prompt: None,
            inject_mode: InjectMode::System,
        }
    }
}

impl Settings {
    /// Build settings from the host store, defaulting every malformed or
    /// missing value.
    pub fn load(store: &impl ConfigStore) -> Self {
        let enable_private_chat = match store.get(KEY_ENABLE_PRIVATE_CHAT) {
            None => true,
            Some(Value::Bool(b)) => b,
            Some(other) => {
                warn!(key = KEY_ENABLE_PRIVATE_CHAT, value = %other, "expected a bool; defaulting to true");
                true
            }
        };

        let enabled_groups = load_groups(store);

        let default_prompt = match store.get(KEY_DEFAULT_PROMPT) {
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Some(other) => {
                warn!(key = KEY_DEFAULT_PROMPT, value = %other, "expected a string; ignoring");
                None
            }
            None => None,
        };

        let inject_mode = match store.get(KEY_INJECT_MODE) {
            None => InjectMode::System,
            Some(Value::String(s)) => InjectMode::from_raw(&s).unwrap_or_else(|| {
                warn!(key = KEY_INJECT_MODE, value = %s, "unknown inject mode; falling back to \"system\"");
                InjectMode::System
            }),
            Some(other) => {
                warn!(key = KEY_INJECT_MODE, value = %other, "expected a string; falling back to \"system\"");
                InjectMode::System
            }
        };

        Self {
            enable_private_chat,
            enabled_groups,
            default_prompt,
            inject_mode,
        }
    }
}

fn load_groups(store: &impl ConfigStore) -> HashSet<String> {
    let raw = match store.get(KEY_ENABLED_GROUPS) {
        None => return HashSet::new(),
        Some(v) => v,
    };
    let Value::Array(items) = raw else {
        error!(key = KEY_ENABLED_GROUPS, "expected a JSON array; treating allow-list as empty");
        return HashSet::new();
    };
    let mut groups = HashSet::new();
    for item in items {
        match item {
            Value::String(s) => {
                groups.insert(s);
            }
            // Numeric group ids are common in hand-written configs.
            Value::Number(n) => {
                groups.insert(n.to_string());
            }
            other => {
                warn!(key = KEY_ENABLED_GROUPS, value = %other, "skipping non-id entry");
            }
        }
    }
    groups
}

// ── Persisted user prompts ─────────────────────────────────────────

/// Decode the persisted user→prompt records.
///
/// The store holds a JSON-array-of-objects **string**; records must carry
/// both a `user_id` and a `prompt` string field to be kept. Malformed JSON
/// or a non-array root yields an empty map plus an error log — the plugin
/// still loads.
pub fn load_user_prompts(store: &impl ConfigStore) -> HashMap<String, String> {
    let raw = match store.get(KEY_USER_PROMPTS) {
        None => return HashMap::new(),
        Some(Value::String(s)) => s,
        Some(_) => {
            error!(key = KEY_USER_PROMPTS, "expected a serialized JSON string; ignoring stored prompts");
            return HashMap::new();
        }
    };

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            error!(key = KEY_USER_PROMPTS, error = %e, "stored prompts are not valid JSON; ignoring");
            return HashMap::new();
        }
    };
    let Value::Array(records) = parsed else {
        error!(key = KEY_USER_PROMPTS, "stored prompts root is not an array; ignoring");
        return HashMap::new();
    };

    let mut prompts = HashMap::new();
    for record in records {
        let user_id = record.get("user_id").and_then(Value::as_str);
        let prompt = record.get("prompt").and_then(Value::as_str);
        match (user_id, prompt) {
            (Some(user_id), Some(prompt)) => {
                // Registry values are non-empty by invariant; a blank prompt
                // (hand-edited config) would otherwise shadow the default.
                let prompt = prompt.trim();
                if prompt.is_empty() {
                    debug!(key = KEY_USER_PROMPTS, user_id, "skipping record with empty prompt");
                } else {
                    prompts.insert(user_id.to_string(), prompt.to_string());
                }
            }
            _ => {
                debug!(key = KEY_USER_PROMPTS, "skipping record missing user_id or prompt");
            }
        }
    }
    prompts
}

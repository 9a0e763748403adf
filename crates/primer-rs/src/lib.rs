//! Per-user prompt injection for chat-bot LLM pipelines.
//!
//! `primer-rs` is a host-agnostic plugin that shapes an outbound LLM request
//! before the host sends it to a provider. On each incoming message it
//! decides whether injection applies (private-chat toggle, group allow-list),
//! resolves which prompt text applies (a sender's personalized prompt always
//! wins over the configured default), and merges the text into the request —
//! either prepended to the system instruction or appended as a synthetic
//! user message.
//!
//! Senders manage their own prompt through three chat commands (view, set,
//! clear). Personalization survives restarts: every mutation re-serializes
//! the user→prompt map and writes it back through the host's configuration
//! store.
//!
//! The plugin never talks to the provider itself. The host owns the event
//! loop, the command dispatcher, and the HTTP call; this crate only plugs
//! into the seams:
//!
//! - [`ChatEvent`] — read-only view of the incoming message (chat type,
//!   group id, sender id).
//! - [`ConfigStore`] — get/set/save access to host configuration.
//! - [`ProviderRequest`] — the request value the plugin mutates in place.
//!
//! # Getting started
//!
//! ```ignore
//! use primer_rs::prelude::*;
//!
//! let store = FileConfigStore::open("primer.json");
//! let mut plugin = UserInjectPlugin::new(store);
//!
//! // In the host's LLM-request hook:
//! plugin.on_llm_request(&event, &mut request).await;
//!
//! // In the host's command dispatcher:
//! let reply = plugin.set_prompt(&event, raw_message_text).await;
//! ```

use serde::{Deserialize, Serialize};

pub mod commands;
pub mod config;
pub mod eligibility;
pub mod event;
pub mod inject;
pub mod plugin;
pub mod prelude;
pub mod registry;
pub mod resolve;
pub mod store;

pub use config::{InjectMode, Settings};
pub use event::{ChatEvent, IncomingMessage};
pub use plugin::UserInjectPlugin;
pub use registry::PromptRegistry;
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore, SaveOutcome};

// ── Provider request types ─────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A role-tagged message in the outbound request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// The outbound LLM request the host is about to send.
///
/// Owned by the host and mutated in place by the plugin: the system
/// instruction may be prepended to, and messages may be appended — never
/// reordered or removed.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProviderRequest {
    /// System-level instruction for the provider.
    pub system_prompt: String,
    /// Accumulated conversation so far, oldest first.
    pub messages: Vec<Message>,
}

impl ProviderRequest {
    /// Create a request with the given system instruction and no messages.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
        }
    }
}

//! Plugin assembly: the LLM-request hook and the command handlers.
//!
//! [`UserInjectPlugin`] owns the loaded [`Settings`] and the
//! [`PromptRegistry`] and exposes the entry points the host dispatches into.
//! Handlers are `async` to slot into the host's dispatcher but complete
//! without suspension — every operation is fast in-memory work plus one
//! fire-and-forget persistence write.
//!
//! Handlers are not reentered mid-execution for the same plugin instance;
//! that serialization is the host's contract. If a host parallelizes
//! command handling across sessions, concurrent sets for the same user are
//! last-write-wins with no lock.

use crate::ProviderRequest;
use crate::commands::{self, SET_COMMANDS, strip_command_tokens};
use crate::config::Settings;
use crate::eligibility::is_eligible;
use crate::event::ChatEvent;
use crate::inject::inject;
use crate::registry::PromptRegistry;
use crate::resolve::resolve;
use crate::store::ConfigStore;
use tracing::info;

/// Per-user prompt injection plugin.
pub struct UserInjectPlugin<S: ConfigStore> {
    settings: Settings,
    registry: PromptRegistry<S>,
    command_prefix: String,
}

impl<S: ConfigStore> UserInjectPlugin<S> {
    /// Load the plugin from the host store with the default `/` command
    /// prefix for help replies.
    pub fn new(store: S) -> Self {
        Self::with_command_prefix(store, "/")
    }

    /// Load the plugin, using the host's command prefix in help replies.
    pub fn with_command_prefix(store: S, command_prefix: impl Into<String>) -> Self {
        let settings = Settings::load(&store);
        let registry = PromptRegistry::new(store);

        info!("user prompt injection plugin loaded");
        if settings.enabled_groups.is_empty() {
            info!("no group allow-list configured; injection applies to all groups and private chats");
        } else {
            info!(groups = ?settings.enabled_groups, "group allow-list configured");
        }
        info!(entries = registry.len(), "personalized prompts loaded");

        Self {
            settings,
            registry,
            command_prefix: command_prefix.into(),
        }
    }

    /// Loaded settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The live prompt registry.
    pub fn registry(&self) -> &PromptRegistry<S> {
        &self.registry
    }

    // ── LLM request hook ───────────────────────────────────────────

    /// Shape the outbound request for this event.
    ///
    /// Runs the eligibility gate, resolves the prompt for the sender, and
    /// injects it in the configured mode. Ineligible messages and senders
    /// with no applicable prompt leave the request untouched.
    pub async fn on_llm_request(&self, event: &impl ChatEvent, req: &mut ProviderRequest) {
        if !is_eligible(&self.settings, event.is_private_chat(), event.group_id()) {
            return;
        }
        let sender = event.sender_id().unwrap_or("");
        if let Some(prompt) = resolve(sender, &self.registry, &self.settings) {
            inject(req, prompt, self.settings.inject_mode);
            info!(
                user = sender,
                mode = %self.settings.inject_mode,
                "injected prompt into outbound request"
            );
        }
    }

    // ── Command handlers ───────────────────────────────────────────

    /// `view_prompt`: show the caller's stored prompt.
    pub async fn view_prompt(&self, event: &impl ChatEvent) -> String {
        let sender = event.sender_id().unwrap_or("");
        match self.registry.get(sender) {
            Some(prompt) => commands::reply_current_prompt(prompt),
            None => commands::reply_no_prompt(&self.command_prefix),
        }
    }

    /// `set_prompt`: store the trailing text as the caller's prompt.
    ///
    /// `raw` is the raw message text; leading command-name tokens are
    /// stripped case-insensitively. An empty remainder returns usage help
    /// without touching the registry.
    pub async fn set_prompt(&mut self, event: &impl ChatEvent, raw: &str) -> String {
        let text = strip_command_tokens(raw, &self.command_prefix, SET_COMMANDS);
        if text.is_empty() {
            return commands::usage_set(&self.command_prefix);
        }
        let sender = event.sender_id().unwrap_or("").to_string();
        let updated = self.registry.set(&sender, text);
        info!(user = %sender, updated, "stored personalized prompt");
        commands::reply_set(updated)
    }

    /// `clear_prompt`: remove the caller's stored prompt.
    pub async fn clear_prompt(&mut self, event: &impl ChatEvent) -> String {
        let sender = event.sender_id().unwrap_or("").to_string();
        if self.registry.remove(&sender) {
            info!(user = %sender, "cleared personalized prompt");
            commands::reply_cleared()
        } else {
            commands::reply_nothing_to_clear(&self.command_prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KEY_DEFAULT_PROMPT, KEY_ENABLED_GROUPS, KEY_INJECT_MODE, KEY_USER_PROMPTS};
    use crate::event::IncomingMessage;
    use crate::store::{MemoryConfigStore, SaveOutcome};
    use crate::{Message, MessageRole};
    use serde_json::{Value, json};

    /// Store that counts save calls, for asserting when persistence fires.
    #[derive(Default)]
    struct CountingStore {
        values: serde_json::Map<String, Value>,
        saves: usize,
    }

    impl ConfigStore for CountingStore {
        fn get(&self, key: &str) -> Option<Value> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: Value) {
            self.values.insert(key.to_string(), value);
        }

        fn save(&mut self) -> SaveOutcome {
            self.saves += 1;
            SaveOutcome::Saved
        }
    }

    fn store_with_prompts(records: &str) -> MemoryConfigStore {
        MemoryConfigStore::new().with(KEY_USER_PROMPTS, json!(records))
    }

    #[tokio::test]
    async fn user_mode_appends_synthetic_user_message() {
        let store = store_with_prompts(r#"[{"user_id":"U1","prompt":"Be concise"}]"#)
            .with(KEY_INJECT_MODE, json!("user"))
            .with(KEY_ENABLED_GROUPS, json!(["G1"]));
        let plugin = UserInjectPlugin::new(store);

        let mut req = ProviderRequest::new("base");
        plugin
            .on_llm_request(&IncomingMessage::group("U1", "G1"), &mut req)
            .await;

        assert_eq!(req.system_prompt, "base");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, MessageRole::User);
        assert_eq!(req.messages[0].content, "Be concise");
    }

    #[tokio::test]
    async fn system_mode_prepends_to_instruction() {
        let store = store_with_prompts(r#"[{"user_id":"U1","prompt":"Be concise"}]"#);
        let plugin = UserInjectPlugin::new(store);

        let mut req = ProviderRequest::new("base");
        plugin
            .on_llm_request(&IncomingMessage::private("U1"), &mut req)
            .await;

        assert_eq!(req.system_prompt, "Be concise\nbase");
        assert!(req.messages.is_empty());
    }

    #[tokio::test]
    async fn ineligible_group_leaves_request_untouched() {
        let store = store_with_prompts(r#"[{"user_id":"U1","prompt":"Be concise"}]"#)
            .with(KEY_ENABLED_GROUPS, json!(["G1"]));
        let plugin = UserInjectPlugin::new(store);

        let mut req = ProviderRequest::new("base");
        plugin
            .on_llm_request(&IncomingMessage::group("U1", "G2"), &mut req)
            .await;

        assert_eq!(req.system_prompt, "base");
        assert!(req.messages.is_empty());
    }

    #[tokio::test]
    async fn no_entry_and_no_default_leaves_request_untouched() {
        let plugin = UserInjectPlugin::new(MemoryConfigStore::new());

        let mut req = ProviderRequest::new("base");
        req.messages.push(Message::user("hello"));
        plugin
            .on_llm_request(&IncomingMessage::private("U1"), &mut req)
            .await;

        assert_eq!(req.system_prompt, "base");
        assert_eq!(req.messages.len(), 1);
    }

    #[tokio::test]
    async fn default_prompt_applies_to_unknown_senders() {
        let store = MemoryConfigStore::new().with(KEY_DEFAULT_PROMPT, json!("Be formal"));
        let plugin = UserInjectPlugin::new(store);

        let mut req = ProviderRequest::new("base");
        plugin
            .on_llm_request(&IncomingMessage::private("U9"), &mut req)
            .await;

        assert_eq!(req.system_prompt, "Be formal\nbase");
    }

    #[tokio::test]
    async fn missing_sender_id_normalizes_to_empty_key() {
        let store = store_with_prompts(r#"[{"user_id":"","prompt":"anon"}]"#);
        let plugin = UserInjectPlugin::new(store);

        let event = IncomingMessage {
            private: true,
            group_id: None,
            sender_id: None,
        };
        let mut req = ProviderRequest::new("base");
        plugin.on_llm_request(&event, &mut req).await;
        assert_eq!(req.system_prompt, "anon\nbase");
    }

    #[tokio::test]
    async fn set_then_view_then_clear_round_trip() {
        let mut plugin = UserInjectPlugin::new(MemoryConfigStore::new());
        let event = IncomingMessage::private("U1");

        let reply = plugin.set_prompt(&event, "/set_prompt Be concise").await;
        assert_eq!(reply, "Your prompt has been saved.");

        let reply = plugin.set_prompt(&event, "/set_prompt Be verbose").await;
        assert_eq!(reply, "Your prompt has been updated.");

        let reply = plugin.view_prompt(&event).await;
        assert!(reply.contains("Be verbose"));

        let reply = plugin.clear_prompt(&event).await;
        assert_eq!(reply, "Your prompt has been cleared.");

        let reply = plugin.view_prompt(&event).await;
        assert!(reply.contains("set_prompt"));
    }

    #[tokio::test]
    async fn empty_set_returns_usage_without_persisting() {
        let mut plugin = UserInjectPlugin::new(CountingStore::default());
        let event = IncomingMessage::private("U1");

        let reply = plugin.set_prompt(&event, "/set_prompt   ").await;
        assert!(reply.starts_with("Usage:"));
        assert!(plugin.registry().get("U1").is_none());
        assert_eq!(plugin.registry().store().saves, 0);
    }

    #[tokio::test]
    async fn clear_without_entry_returns_help_without_persisting() {
        let mut plugin = UserInjectPlugin::new(CountingStore::default());
        let event = IncomingMessage::private("U1");

        let reply = plugin.clear_prompt(&event).await;
        assert!(reply.contains("set_prompt"));
        assert_eq!(plugin.registry().store().saves, 0);
    }

    /// Store whose save always fails, as a broken disk would.
    #[derive(Default)]
    struct FailingStore {
        values: serde_json::Map<String, Value>,
    }

    impl ConfigStore for FailingStore {
        fn get(&self, key: &str) -> Option<Value> {
            self.values.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: Value) {
            self.values.insert(key.to_string(), value);
        }

        fn save(&mut self) -> SaveOutcome {
            SaveOutcome::Failed("disk full".to_string())
        }
    }

    #[tokio::test]
    async fn failed_persistence_never_reaches_the_command_caller() {
        let mut plugin = UserInjectPlugin::new(FailingStore::default());
        let event = IncomingMessage::private("U1");

        let reply = plugin.set_prompt(&event, "/set_prompt Be concise").await;
        assert_eq!(reply, "Your prompt has been saved.");
        assert_eq!(plugin.registry().get("U1"), Some("Be concise"));

        let reply = plugin.clear_prompt(&event).await;
        assert_eq!(reply, "Your prompt has been cleared.");
        assert!(plugin.registry().get("U1").is_none());
    }

    #[tokio::test]
    async fn commands_are_scoped_per_sender() {
        let mut plugin = UserInjectPlugin::new(MemoryConfigStore::new());
        plugin
            .set_prompt(&IncomingMessage::private("U1"), "set_prompt Be concise")
            .await;

        let reply = plugin.view_prompt(&IncomingMessage::private("U2")).await;
        assert!(reply.contains("no personalized prompt"));
    }
}

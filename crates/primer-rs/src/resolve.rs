//! Prompt resolution precedence.

use crate::config::Settings;
use crate::registry::PromptRegistry;
use crate::store::ConfigStore;

/// The prompt text to inject for `user_id`, if any.
///
/// Precedence is fixed: the sender's personalized entry always wins, then
/// the configured default prompt, then nothing. A personalized prompt is
/// never shadowed by the default.
pub fn resolve<'a, S: ConfigStore>(
    user_id: &str,
    registry: &'a PromptRegistry<S>,
    settings: &'a Settings,
) -> Option<&'a str> {
    registry
        .get(user_id)
        .or(settings.default_prompt.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryConfigStore;

    fn registry_with(entries: &[(&str, &str)]) -> PromptRegistry<MemoryConfigStore> {
        let mut registry = PromptRegistry::new(MemoryConfigStore::new());
        for (user, prompt) in entries {
            registry.set(user, prompt);
        }
        registry
    }

    #[test]
    fn personalized_entry_wins_over_default() {
        let registry = registry_with(&[("U1", "Be concise")]);
        let settings = Settings {
            default_prompt: Some("Be formal".to_string()),
            ..Settings::default()
        };
        assert_eq!(resolve("U1", &registry, &settings), Some("Be concise"));
    }

    #[test]
    fn default_applies_without_an_entry() {
        let registry = registry_with(&[]);
        let settings = Settings {
            default_prompt: Some("Be formal".to_string()),
            ..Settings::default()
        };
        assert_eq!(resolve("U1", &registry, &settings), Some("Be formal"));
    }

    #[test]
    fn neither_yields_nothing() {
        let registry = registry_with(&[]);
        let settings = Settings::default();
        assert_eq!(resolve("U1", &registry, &settings), None);
    }
}

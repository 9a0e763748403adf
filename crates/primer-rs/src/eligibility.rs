//! The gate that decides whether injection logic runs for a message.

use crate::config::Settings;

/// Whether injection applies to a message in the given chat context.
///
/// Private chats are gated by `enable_private_chat`. Group chats are allowed
/// when the allow-list is empty (unrestricted) or contains the group id.
/// Call this before any prompt lookup; an ineligible message must not touch
/// the registry or the request.
pub fn is_eligible(settings: &Settings, is_private_chat: bool, group_id: Option<&str>) -> bool {
    if is_private_chat {
        return settings.enable_private_chat;
    }
    settings.enabled_groups.is_empty()
        || group_id.is_some_and(|id| settings.enabled_groups.contains(id))
}

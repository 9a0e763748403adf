//! Inbound event seam.
//!
//! The host's messaging runtime delivers events; the plugin only needs the
//! chat-type classification and two opaque identifiers. Implement
//! [`ChatEvent`] for the host's event type, or use [`IncomingMessage`] when
//! a plain value is enough (tests, the demo CLI).

/// Read-only view of an incoming message.
pub trait ChatEvent {
    /// Whether this message arrived in a private chat.
    fn is_private_chat(&self) -> bool;

    /// The group identifier, when the message arrived in a group.
    fn group_id(&self) -> Option<&str>;

    /// The sender identifier. `None` normalizes to the empty string inside
    /// the plugin.
    fn sender_id(&self) -> Option<&str>;
}

/// A plain [`ChatEvent`] value.
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub private: bool,
    pub group_id: Option<String>,
    pub sender_id: Option<String>,
}

impl IncomingMessage {
    /// A private-chat message from `sender`.
    pub fn private(sender: impl Into<String>) -> Self {
        Self {
            private: true,
            group_id: None,
            sender_id: Some(sender.into()),
        }
    }

    /// A group message from `sender` in `group`.
    pub fn group(sender: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            private: false,
            group_id: Some(group.into()),
            sender_id: Some(sender.into()),
        }
    }
}

impl ChatEvent for IncomingMessage {
    fn is_private_chat(&self) -> bool {
        self.private
    }

    fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    fn sender_id(&self) -> Option<&str> {
        self.sender_id.as_deref()
    }
}

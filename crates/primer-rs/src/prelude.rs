//! Common imports for host integrations.
//!
//! ```ignore
//! use primer_rs::prelude::*;
//! ```

pub use crate::config::{InjectMode, Settings};
pub use crate::event::{ChatEvent, IncomingMessage};
pub use crate::plugin::UserInjectPlugin;
pub use crate::registry::PromptRegistry;
pub use crate::store::{ConfigStore, FileConfigStore, MemoryConfigStore, SaveOutcome};
pub use crate::{Message, MessageRole, ProviderRequest};

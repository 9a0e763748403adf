//! Merging resolved prompt text into the outbound request.

use crate::config::InjectMode;
use crate::{Message, ProviderRequest};

/// Apply `prompt` to the request in the given mode.
///
/// `System` prepends the prompt plus a newline to the existing system
/// instruction — injected text takes the priority position, and repeated
/// injection stacks newest-first. `User` appends a synthetic user message;
/// anything the host adds afterwards lands after it.
pub fn inject(req: &mut ProviderRequest, prompt: &str, mode: InjectMode) {
    match mode {
        InjectMode::System => {
            req.system_prompt = format!("{prompt}\n{}", req.system_prompt);
        }
        InjectMode::User => {
            req.messages.push(Message::user(prompt));
        }
    }
}

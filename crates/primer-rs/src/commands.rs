//! Command-surface text handling: token stripping and reply formatting.
//!
//! Hosts dispatch commands by name and pass the raw message text through.
//! Depending on the dispatcher, that text may still start with the command
//! token itself (and the host's command prefix), so the set handler strips
//! leading tokens that name the command before treating the remainder as
//! prompt text. User-input problems are replies, never errors.

/// Names the view command answers to.
pub const VIEW_COMMANDS: &[&str] = &["view_prompt", "my_prompt"];
/// Names the set command answers to.
pub const SET_COMMANDS: &[&str] = &["set_prompt", "add_prompt"];
/// Names the clear command answers to.
pub const CLEAR_COMMANDS: &[&str] = &["clear_prompt", "del_prompt"];

/// Strip leading command-name tokens from `raw`, case-insensitively.
///
/// A token matches when it equals one of `names`, with or without the
/// host's command `prefix`. Internal spacing of the remaining text is
/// preserved; only the edges are trimmed.
pub fn strip_command_tokens<'a>(raw: &'a str, prefix: &str, names: &[&str]) -> &'a str {
    let mut rest = raw.trim();
    loop {
        let (token, tail) = match rest.split_once(char::is_whitespace) {
            Some(pair) => pair,
            None => (rest, ""),
        };
        if token.is_empty() || !is_command_token(token, prefix, names) {
            break;
        }
        rest = tail.trim_start();
    }
    rest.trim_end()
}

fn is_command_token(token: &str, prefix: &str, names: &[&str]) -> bool {
    let bare = if prefix.is_empty() {
        token
    } else {
        token.strip_prefix(prefix).unwrap_or(token)
    };
    names.iter().any(|name| bare.eq_ignore_ascii_case(name))
}

// ── Replies ────────────────────────────────────────────────────────

/// Usage help for a set command with no prompt text.
pub fn usage_set(prefix: &str) -> String {
    format!("Usage: {prefix}set_prompt <prompt text>")
}

/// Reply for a view command when no prompt is stored.
pub fn reply_no_prompt(prefix: &str) -> String {
    format!("You have no personalized prompt. Set one with {prefix}set_prompt <prompt text>.")
}

/// Reply for a view command showing the stored prompt.
pub fn reply_current_prompt(prompt: &str) -> String {
    format!("Your current prompt: {prompt}")
}

/// Reply after a set command, distinguishing first write from overwrite.
pub fn reply_set(updated: bool) -> String {
    if updated {
        "Your prompt has been updated.".to_string()
    } else {
        "Your prompt has been saved.".to_string()
    }
}

/// Reply after a successful clear.
pub fn reply_cleared() -> String {
    "Your prompt has been cleared.".to_string()
}

/// Reply for a clear command when nothing was stored.
pub fn reply_nothing_to_clear(prefix: &str) -> String {
    format!("You have no personalized prompt to clear. Set one with {prefix}set_prompt <prompt text>.")
}

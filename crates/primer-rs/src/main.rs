//! Manage and test per-user injected prompts against a JSON config file.
//!
//! # Examples
//!
//! ```sh
//! # Store a prompt for a user
//! primer --config primer.json set --user U1 Be concise
//!
//! # Show and clear it
//! primer --config primer.json view --user U1
//! primer --config primer.json clear --user U1
//!
//! # Simulate an incoming group message and print the shaped request
//! primer --config primer.json simulate --user U1 --group G1 \
//!   --system "You are a helpful assistant."
//! ```

use clap::{Parser, Subcommand};
use primer_rs::prelude::*;
use std::path::PathBuf;

/// Manage and test per-user injected prompts against a JSON config file.
#[derive(Parser)]
#[command(name = "primer")]
struct Cli {
    /// Path to the plugin config file (JSON object)
    #[arg(long, default_value = "primer.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the stored prompt for a user
    View {
        #[arg(long)]
        user: String,
    },
    /// Store a prompt for a user (overwrites any prior value)
    Set {
        #[arg(long)]
        user: String,
        /// Prompt text
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
    /// Clear the stored prompt for a user
    Clear {
        #[arg(long)]
        user: String,
    },
    /// Simulate an incoming message and print the request after injection
    Simulate {
        #[arg(long)]
        user: String,
        /// Group the message arrives in; omit together with --private for
        /// an unidentified group
        #[arg(long)]
        group: Option<String>,
        /// Treat the message as a private chat
        #[arg(long)]
        private: bool,
        /// Base system instruction of the request
        #[arg(long, default_value = "You are a helpful assistant.")]
        system: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = FileConfigStore::open(&cli.config);
    let mut plugin = UserInjectPlugin::new(store);

    match cli.command {
        Command::View { user } => {
            let reply = plugin.view_prompt(&IncomingMessage::private(user)).await;
            println!("{reply}");
        }
        Command::Set { user, text } => {
            let reply = plugin
                .set_prompt(&IncomingMessage::private(user), &text.join(" "))
                .await;
            println!("{reply}");
        }
        Command::Clear { user } => {
            let reply = plugin.clear_prompt(&IncomingMessage::private(user)).await;
            println!("{reply}");
        }
        Command::Simulate {
            user,
            group,
            private,
            system,
        } => {
            let event = IncomingMessage {
                private,
                group_id: group,
                sender_id: Some(user),
            };
            let mut req = ProviderRequest::new(system);
            plugin.on_llm_request(&event, &mut req).await;
            match serde_json::to_string_pretty(&req) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => eprintln!("failed to render request: {e}"),
            }
        }
    }
}

//! Chatresume CLI — entry point.
//!
//! # Commands
//!
//! - `chatresume path` — show where the state file lives
//! - `chatresume get --chat ID [--owner ID] --engine NAME` — print a resume token
//! - `chatresume set --chat ID [--owner ID] --engine NAME --value TOKEN` — store a token
//! - `chatresume clear --chat ID [--owner ID]` — drop every session of a chat

mod helpers;
mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use chatresume_core::paths::{get_config_path, resolve_sessions_path};
use chatresume_core::{chat_key, ResumeToken, SessionStore};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Inspect and edit stored chat resume tokens
#[derive(Parser, Debug)]
#[command(name = "chatresume", version, about, long_about = None)]
struct Cli {
    /// Config file path; the state file lives in the same directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Identifies one logical chat.
#[derive(Args, Debug)]
struct ChatArgs {
    /// Chat identifier
    #[arg(long, allow_negative_numbers = true)]
    chat: i64,

    /// Owner identifier for per-user sessions in a shared chat
    #[arg(long, allow_negative_numbers = true)]
    owner: Option<i64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the state file location
    Path,

    /// Print the resume token of an engine
    Get {
        #[command(flatten)]
        chat: ChatArgs,

        /// Engine name (e.g. "codex")
        #[arg(long)]
        engine: String,
    },

    /// Store a resume token for an engine
    Set {
        #[command(flatten)]
        chat: ChatArgs,

        /// Engine name (e.g. "codex")
        #[arg(long)]
        engine: String,

        /// Token value
        #[arg(long)]
        value: String,
    },

    /// Drop every engine session of a chat
    Clear {
        #[command(flatten)]
        chat: ChatArgs,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.unwrap_or_else(get_config_path);
    let store = SessionStore::new(resolve_sessions_path(&config_path));
    debug!(config = %config_path.display(), state = %store.path().display(), "resolved paths");

    run(cli.command, &store).await
}

async fn run(command: Commands, store: &SessionStore) -> Result<()> {
    match command {
        Commands::Path => status::run(store.path()),
        Commands::Get { chat, engine } => {
            let token = store
                .get_session_resume(chat.chat, chat.owner, &engine)
                .await
                .with_context(|| format!("failed to read {}", store.path().display()))?;
            helpers::print_token(&chat_key(chat.chat, chat.owner), &engine, token.as_ref());
            Ok(())
        }
        Commands::Set {
            chat,
            engine,
            value,
        } => {
            let token = ResumeToken::new(engine, value);
            store
                .set_session_resume(chat.chat, chat.owner, &token)
                .await
                .with_context(|| format!("failed to save {}", store.path().display()))?;
            helpers::print_saved(&chat_key(chat.chat, chat.owner), &token.engine);
            Ok(())
        }
        Commands::Clear { chat } => {
            store
                .clear_sessions(chat.chat, chat.owner)
                .await
                .with_context(|| format!("failed to save {}", store.path().display()))?;
            helpers::print_cleared(&chat_key(chat.chat, chat.owner));
            Ok(())
        }
    }
}

/// Initialize tracing/logging. Logs go to stderr so stdout stays clean.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("chatresume=debug,chatresume_core=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chatresume_core::session::STATE_FILENAME;
    use tempfile::TempDir;

    #[test]
    fn parse_get_with_owner() {
        let cli = Cli::try_parse_from([
            "chatresume", "get", "--chat", "5", "--owner", "2", "--engine", "codex",
        ])
        .unwrap();
        match cli.command {
            Commands::Get { chat, engine } => {
                assert_eq!(chat.chat, 5);
                assert_eq!(chat.owner, Some(2));
                assert_eq!(engine, "codex");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_negative_chat_id() {
        let cli = Cli::try_parse_from(["chatresume", "clear", "--chat", "-100123"]).unwrap();
        match cli.command {
            Commands::Clear { chat } => {
                assert_eq!(chat.chat, -100123);
                assert_eq!(chat.owner, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["chatresume", "path", "--config", "/tmp/x.toml", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn parse_set_requires_value() {
        let result = Cli::try_parse_from([
            "chatresume", "set", "--chat", "1", "--engine", "codex",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn run_set_get_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(resolve_sessions_path(&dir.path().join("config.toml")));
        assert!(store.path().ends_with(STATE_FILENAME));

        let set = Cli::try_parse_from([
            "chatresume", "set", "--chat", "100", "--engine", "codex", "--value", "tok-1",
        ])
        .unwrap();
        run(set.command, &store).await.unwrap();
        assert_eq!(
            store.get_session_resume(100, None, "codex").await.unwrap(),
            Some(ResumeToken::new("codex", "tok-1"))
        );

        let get = Cli::try_parse_from(["chatresume", "get", "--chat", "100", "--engine", "codex"])
            .unwrap();
        run(get.command, &store).await.unwrap();

        let clear = Cli::try_parse_from(["chatresume", "clear", "--chat", "100"]).unwrap();
        run(clear.command, &store).await.unwrap();
        assert!(store.get_session_resume(100, None, "codex").await.unwrap().is_none());
    }
}

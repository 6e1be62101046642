//! Session store — per-chat resume tokens cached in memory and mirrored to one JSON file.
//!
//! # Disk format
//!
//! A single `telegram_chat_sessions_state.json` next to the config file:
//!
//! ```json
//! {
//!   "chats": {
//!     "100:chat": { "sessions": { "codex": { "resume": "tok-1" } } }
//!   },
//!   "version": 1
//! }
//! ```
//!
//! Keys are sorted, indentation is two spaces, and the file ends with a newline.

pub mod store;

pub use store::{SessionStore, STATE_FILENAME, STATE_VERSION};

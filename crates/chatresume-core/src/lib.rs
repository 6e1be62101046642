//! Chatresume core — per-chat resume token persistence.
//!
//! This crate provides:
//! - **types**: `ResumeToken` and the chat key derivation
//! - **session**: `SessionStore` — lock-guarded in-memory state mirrored to one JSON file
//! - **paths**: data/config path resolution
//! - **error**: `StoreError` and the crate `Result` alias

pub mod error;
pub mod paths;
pub mod session;
pub mod types;

pub use error::{Result, StoreError};
pub use session::SessionStore;
pub use types::{chat_key, ResumeToken};

use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

/// Key the prefill question is stored under
pub const PREFILL_KEY: &str = "gita_qna_prefill";

/// Error type for mailbox operations
#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("Mailbox I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Mailbox serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Mailbox lock poisoned: {0}")]
    Poisoned(String),
}

/// Single-slot store for the prefill question
pub trait PrefillMailbox: Send + Sync + Debug {
    /// Store a value, replacing whatever was there
    fn put(&self, value: String) -> Result<(), MailboxError>;

    /// Read the value and clear the slot. An empty slot is `Ok(None)`.
    fn take_once(&self) -> Result<Option<String>, MailboxError>;
}

/// Type alias for Arc-wrapped PrefillMailbox trait objects
pub type MailboxRef = Arc<dyn PrefillMailbox>;

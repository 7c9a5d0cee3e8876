//! One-shot handoff of a composed question from the decision compass to the
//! Q&A flow.
//!
//! The value lives in a single slot under a well-known key. Writers overwrite
//! it; the reader takes it and clears it in the same step, so a value is seen
//! at most once.

pub mod adapters;
pub mod store;

pub use adapters::{FileMailbox, InMemoryMailbox};
pub use store::{MailboxError, MailboxRef, PrefillMailbox, PREFILL_KEY};

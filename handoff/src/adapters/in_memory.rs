use std::sync::Mutex;

use log::debug;

use crate::store::{MailboxError, PrefillMailbox};

/// In-memory implementation of PrefillMailbox
#[derive(Debug, Default)]
pub struct InMemoryMailbox {
    slot: Mutex<Option<String>>,
}

impl InMemoryMailbox {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefillMailbox for InMemoryMailbox {
    fn put(&self, value: String) -> Result<(), MailboxError> {
        let mut slot = self.slot.lock().map_err(|e| {
            MailboxError::Poisoned(format!("Failed to acquire mailbox lock: {}", e))
        })?;

        if slot.replace(value).is_some() {
            debug!("Replaced pending prefill");
        }
        Ok(())
    }

    fn take_once(&self) -> Result<Option<String>, MailboxError> {
        let mut slot = self.slot.lock().map_err(|e| {
            MailboxError::Poisoned(format!("Failed to acquire mailbox lock: {}", e))
        })?;

        Ok(slot.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mailbox() {
        let mailbox = InMemoryMailbox::new();
        assert_eq!(mailbox.take_once().unwrap(), None);
    }

    #[test]
    fn test_take_once_clears_slot() {
        let mailbox = InMemoryMailbox::new();
        mailbox.put("Explain BG 2.47".to_string()).unwrap();

        assert_eq!(mailbox.take_once().unwrap(), Some("Explain BG 2.47".to_string()));
        assert_eq!(mailbox.take_once().unwrap(), None);
    }

    #[test]
    fn test_put_overwrites() {
        let mailbox = InMemoryMailbox::new();
        mailbox.put("first".to_string()).unwrap();
        mailbox.put("second".to_string()).unwrap();

        assert_eq!(mailbox.take_once().unwrap(), Some("second".to_string()));
        assert_eq!(mailbox.take_once().unwrap(), None);
    }
}

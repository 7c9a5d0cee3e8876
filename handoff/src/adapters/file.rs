use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::store::{MailboxError, PrefillMailbox, PREFILL_KEY};

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// On-disk form of the slot
#[derive(Debug, Serialize, Deserialize)]
struct PrefillRecord {
    value: String,
    stored_at: DateTime<Utc>,
}

/// File-backed implementation of PrefillMailbox.
///
/// The slot is `<dir>/<key>.json`. Every mutation goes through `rename`, which
/// replaces or claims the slot in one step, so independent processes sharing
/// the directory never observe a half-written value and at most one of them
/// takes it.
#[derive(Debug, Clone)]
pub struct FileMailbox {
    dir: PathBuf,
    key: String,
}

impl FileMailbox {
    /// Mailbox under the well-known prefill key
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_key(dir, PREFILL_KEY)
    }

    pub fn with_key(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn scratch_path(&self, kind: &str) -> PathBuf {
        let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!("{}.json.{}-{}-{}", self.key, kind, std::process::id(), n))
    }
}

impl PrefillMailbox for FileMailbox {
    fn put(&self, value: String) -> Result<(), MailboxError> {
        fs::create_dir_all(&self.dir)?;

        let record = PrefillRecord {
            value,
            stored_at: Utc::now(),
        };
        let bytes = serde_json::to_vec(&record)?;
        let tmp = self.scratch_path("tmp");

        // A failed write or rename must not leave the scratch file behind
        if let Err(e) = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, self.slot_path())) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!("Stored prefill in {}", self.slot_path().display());
        Ok(())
    }

    fn take_once(&self) -> Result<Option<String>, MailboxError> {
        let claim = self.scratch_path("claim");
        match fs::rename(self.slot_path(), &claim) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let content = fs::read_to_string(&claim);
        if let Err(e) = fs::remove_file(&claim) {
            warn!("Could not remove claimed prefill {}: {}", claim.display(), e);
        }

        match serde_json::from_str::<PrefillRecord>(&content?) {
            Ok(record) => {
                debug!("Took prefill stored at {}", record.stored_at);
                Ok(Some(record.value))
            }
            Err(e) => {
                warn!("Discarding unreadable prefill record: {}", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_absent_slot_is_empty() {
        let dir = tempdir().unwrap();
        let mailbox = FileMailbox::new(dir.path().join("not-created-yet"));
        assert_eq!(mailbox.take_once().unwrap(), None);
    }

    #[test]
    fn test_value_survives_new_instance() {
        let dir = tempdir().unwrap();

        FileMailbox::new(dir.path())
            .put("Please explain BG 2.47".to_string())
            .unwrap();

        // A later "page load" opens its own handle on the same directory
        let reader = FileMailbox::new(dir.path());
        assert_eq!(
            reader.take_once().unwrap(),
            Some("Please explain BG 2.47".to_string())
        );
        assert_eq!(reader.take_once().unwrap(), None);
        assert_eq!(FileMailbox::new(dir.path()).take_once().unwrap(), None);
    }

    #[test]
    fn test_put_overwrites_and_leaves_no_scratch_files() {
        let dir = tempdir().unwrap();
        let mailbox = FileMailbox::new(dir.path());

        mailbox.put("first".to_string()).unwrap();
        mailbox.put("second".to_string()).unwrap();
        assert_eq!(mailbox.take_once().unwrap(), Some("second".to_string()));

        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempdir().unwrap();
        let prefill = FileMailbox::new(dir.path());
        let other = FileMailbox::with_key(dir.path(), "other_slot");

        prefill.put("mine".to_string()).unwrap();
        assert_eq!(other.take_once().unwrap(), None);
        assert_eq!(prefill.take_once().unwrap(), Some("mine".to_string()));
    }

    #[test]
    fn test_corrupt_record_is_discarded() {
        let dir = tempdir().unwrap();
        let mailbox = FileMailbox::new(dir.path());
        fs::write(mailbox.slot_path(), "not json").unwrap();

        assert_eq!(mailbox.take_once().unwrap(), None);
        assert!(!mailbox.slot_path().exists());
    }

    #[test]
    fn test_concurrent_readers_take_at_most_once() {
        let dir = tempdir().unwrap();
        FileMailbox::new(dir.path())
            .put("only once".to_string())
            .unwrap();

        let taken: Vec<Option<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let reader = FileMailbox::new(dir.path());
                    scope.spawn(move || reader.take_once().unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let hits: Vec<_> = taken.into_iter().flatten().collect();
        assert_eq!(hits, vec!["only once".to_string()]);
    }

    #[test]
    fn test_failed_put_leaves_no_scratch_files() {
        let dir = tempdir().unwrap();
        let mailbox = FileMailbox::new(dir.path());

        // A non-empty directory where the slot should be makes the rename fail
        fs::create_dir(mailbox.slot_path()).unwrap();
        fs::write(mailbox.slot_path().join("keep"), "x").unwrap();

        assert!(mailbox.put("lost".to_string()).is_err());

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![mailbox.slot_path().file_name().unwrap().to_owned()]);
    }
}

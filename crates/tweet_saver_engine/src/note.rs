use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use saver_logging::{saver_debug, saver_info, saver_warn};

use crate::clipboard::{note_link, ClipboardSink};
use crate::filename::{folder_path, normalize_folder, note_filename, note_relative_path};
use crate::frontmatter::render_note_document;
use crate::persist::{PersistError, Vault, WriteOutcome};
use crate::{ExtractedPost, SavedNote, SaverSettings};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Turns an [`ExtractedPost`] into a note in the vault.
///
/// The target path depends only on the post and the configured folder, so
/// saving the same post again overwrites the earlier note. Writers to the
/// same path are serialized.
pub struct NoteWriter {
    vault: Arc<dyn Vault>,
    clipboard: Option<Arc<dyn ClipboardSink>>,
    clock: Clock,
    path_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl NoteWriter {
    pub fn new(vault: Arc<dyn Vault>) -> Self {
        Self {
            vault,
            clipboard: None,
            clock: Arc::new(Utc::now),
            path_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn save(
        &self,
        post: &ExtractedPost,
        settings: &SaverSettings,
    ) -> Result<SavedNote, PersistError> {
        let folder = normalize_folder(&settings.tweets_folder)?;
        if let Some(folder) = folder.as_deref() {
            let dir = folder_path(folder);
            if !self.vault.exists(&dir) {
                self.vault.create_folder(&dir)?;
            }
        }

        let filename = note_filename(post);
        let relative_path = note_relative_path(folder.as_deref(), &filename);

        let lock = self.lock_for(&relative_path);
        let written = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            let content = render_note_document(post, (self.clock)());
            self.vault.write(&relative_path, &content)
        };
        drop(lock);
        self.release_lock(&relative_path);
        let outcome = written?;
        match outcome {
            WriteOutcome::Created => {
                saver_info!("Tweet saved as: {}", relative_path.display())
            }
            WriteOutcome::Overwritten => {
                saver_info!("Tweet overwritten at: {}", relative_path.display())
            }
        }

        let clipboard_copied = settings.copy_path_to_clipboard && self.copy_link(&filename);

        Ok(SavedNote {
            relative_path,
            filename,
            outcome,
            clipboard_copied,
        })
    }

    fn copy_link(&self, filename: &str) -> bool {
        let Some(clipboard) = self.clipboard.as_ref() else {
            saver_debug!("No clipboard available; skipping note link copy");
            return false;
        };
        match clipboard.write_text(&note_link(filename)) {
            Ok(()) => {
                saver_info!("Filename copied to clipboard: {}", filename);
                true
            }
            Err(err) => {
                saver_warn!("Could not copy note link to clipboard: {}", err);
                false
            }
        }
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self
            .path_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(path.to_path_buf()).or_default().clone()
    }

    /// Drops the entry for `path` once no writer holds it.
    fn release_lock(&self, path: &Path) {
        let mut locks = self
            .path_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(path)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(path);
        }
    }
}

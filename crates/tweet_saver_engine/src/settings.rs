use serde::{Deserialize, Serialize};

pub const DEFAULT_TWEETS_FOLDER: &str = "Tweets";

/// User-facing settings. Missing keys fall back to the defaults when loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaverSettings {
    /// Folder under the vault root; empty stores notes at the root.
    pub tweets_folder: String,
    pub copy_path_to_clipboard: bool,
}

impl Default for SaverSettings {
    fn default() -> Self {
        Self {
            tweets_folder: DEFAULT_TWEETS_FOLDER.to_string(),
            copy_path_to_clipboard: true,
        }
    }
}

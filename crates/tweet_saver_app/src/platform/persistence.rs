use std::fs;
use std::path::Path;

use saver_logging::{saver_error, saver_info, saver_warn};
use tweet_saver_engine::{AtomicFileWriter, SaverSettings};

pub(crate) const SETTINGS_FILENAME: &str = ".tweet_saver.ron";

/// Reads settings from the vault root. Missing or unreadable settings fall
/// back to the defaults; keys absent from the file take their default value.
pub(crate) fn load_settings(vault_root: &Path) -> SaverSettings {
    let path = vault_root.join(SETTINGS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            saver_info!("No settings at {:?}; writing defaults", path);
            let defaults = SaverSettings::default();
            save_settings(vault_root, &defaults);
            return defaults;
        }
        Err(err) => {
            saver_warn!("Failed to read settings from {:?}: {}", path, err);
            return SaverSettings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            saver_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            saver_warn!("Failed to parse settings from {:?}: {}", path, err);
            SaverSettings::default()
        }
    }
}

pub(crate) fn save_settings(vault_root: &Path, settings: &SaverSettings) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(settings, pretty) {
        Ok(text) => text,
        Err(err) => {
            saver_error!("Failed to serialize settings: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(vault_root.to_path_buf());
    if let Err(err) = writer.write(Path::new(SETTINGS_FILENAME), &content) {
        saver_error!("Failed to write settings to {:?}: {}", vault_root, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_load_writes_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(temp.path());
        assert_eq!(settings, SaverSettings::default());
        assert!(temp.path().join(SETTINGS_FILENAME).is_file());
    }

    #[test]
    fn saved_settings_are_loaded_back() {
        let temp = TempDir::new().unwrap();
        let custom = SaverSettings {
            tweets_folder: "Bookmarks/Tweets".to_string(),
            copy_path_to_clipboard: false,
        };
        save_settings(temp.path(), &custom);
        assert_eq!(load_settings(temp.path()), custom);
    }

    #[test]
    fn partial_file_is_merged_over_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILENAME),
            "(copyPathToClipboard: false)",
        )
        .unwrap();
        let settings = load_settings(temp.path());
        assert_eq!(settings.tweets_folder, "Tweets");
        assert!(!settings.copy_path_to_clipboard);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(SETTINGS_FILENAME), "{{{").unwrap();
        assert_eq!(load_settings(temp.path()), SaverSettings::default());
    }
}

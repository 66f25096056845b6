use std::path::{Component, Path, PathBuf};

use crate::persist::PersistError;
use crate::ExtractedPost;

pub const NOTE_EXTENSION: &str = "md";
/// Number of body characters that feed the filename, counted before sanitizing.
pub const BODY_PREFIX_CHARS: usize = 20;

/// Deterministic note filename: `{author} - {body prefix}....md`.
///
/// The four dots before the extension match notes saved by earlier versions
/// and must not change.
pub fn note_filename(post: &ExtractedPost) -> String {
    let author = sanitize_component(&post.author_name);
    let prefix: String = post.body_text.chars().take(BODY_PREFIX_CHARS).collect();
    let prefix = sanitize_component(&prefix);
    format!("{author} - {prefix}....{NOTE_EXTENSION}")
}

/// Keeps ASCII letters, digits and spaces, then trims.
pub fn sanitize_component(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalizes a configured folder into `a/b/c` form.
///
/// Backslashes count as separators and empty and `.` segments are dropped.
/// A segment that is not a plain name (`..`, a drive prefix such as `C:`,
/// anything containing `:`) is rejected so the folder can never leave the
/// vault root. Returns `None` for the vault root itself.
pub fn normalize_folder(raw: &str) -> Result<Option<String>, PersistError> {
    let mut segments = Vec::new();
    for segment in raw.trim().split(['/', '\\']) {
        let segment = segment.trim();
        match segment {
            "" | "." => continue,
            other if is_plain_segment(other) => segments.push(other),
            _ => return Err(PersistError::InvalidFolder(raw.to_string())),
        }
    }
    if segments.is_empty() {
        Ok(None)
    } else {
        Ok(Some(segments.join("/")))
    }
}

fn is_plain_segment(segment: &str) -> bool {
    if segment.contains(':') {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Vault-relative path of a folder returned by [`normalize_folder`].
pub fn folder_path(folder: &str) -> PathBuf {
    folder.split('/').collect()
}

/// Joins a normalized folder and a filename into a vault-relative path.
pub fn note_relative_path(folder: Option<&str>, filename: &str) -> PathBuf {
    match folder {
        Some(folder) => folder_path(folder).join(filename),
        None => PathBuf::from(filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author: &str, body: &str) -> ExtractedPost {
        ExtractedPost {
            canonical_url: "https://twitter.com/user/status/1".to_string(),
            author_name: author.to_string(),
            author_url: "https://twitter.com/user".to_string(),
            body_text: body.to_string(),
        }
    }

    #[test]
    fn sanitize_drops_punctuation_and_emoji() {
        assert_eq!(sanitize_component("Jane_Doe! 🚀"), "JaneDoe");
    }

    #[test]
    fn body_is_truncated_before_sanitizing() {
        // 20 raw chars: "Rust 2024: it's out!" -> punctuation removed afterwards.
        let name = note_filename(&post("Jane Doe", "Rust 2024: it's out! Go read the notes"));
        assert_eq!(name, "Jane Doe - Rust 2024 its out....md");
    }

    #[test]
    fn newlines_in_prefix_are_removed() {
        let name = note_filename(&post("Jane Doe", "Hi there\nbye"));
        assert_eq!(name, "Jane Doe - Hi therebye....md");
    }

    #[test]
    fn multibyte_body_truncates_on_char_boundary() {
        let name = note_filename(&post("A", "ééééééééééééééééééééabc"));
        assert_eq!(name, "A - ....md");
    }

    #[test]
    fn filename_is_deterministic() {
        let p = post("Jane Doe", "same body");
        assert_eq!(note_filename(&p), note_filename(&p));
    }

    #[test]
    fn folder_is_normalized() {
        assert_eq!(normalize_folder("").unwrap(), None);
        assert_eq!(normalize_folder("  /  ").unwrap(), None);
        assert_eq!(
            normalize_folder("Bookmarks//Tweets/").unwrap().as_deref(),
            Some("Bookmarks/Tweets")
        );
        assert_eq!(
            normalize_folder("\\Bookmarks\\.\\Tweets").unwrap().as_deref(),
            Some("Bookmarks/Tweets")
        );
    }

    #[test]
    fn parent_segments_are_rejected() {
        assert!(matches!(
            normalize_folder("Tweets/../../etc"),
            Err(PersistError::InvalidFolder(_))
        ));
        for drive in ["C:/Users/x", "C:", "d:\\notes", "Tweets/C:", "Tweets/a:b"] {
            assert!(
                matches!(normalize_folder(drive), Err(PersistError::InvalidFolder(_))),
                "{drive} should be rejected"
            );
        }
    }

    #[test]
    fn normalized_folder_stays_relative() {
        let folder = normalize_folder("Bookmarks\\Tweets 2024/x").unwrap().unwrap();
        let path = folder_path(&folder);
        assert!(path.is_relative());
        assert!(path
            .components()
            .all(|component| matches!(component, Component::Normal(_))));
    }

    #[test]
    fn relative_path_joins_segments() {
        let path = note_relative_path(Some("Bookmarks/Tweets"), "a - b....md");
        let parts: Vec<_> = path.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(parts, vec!["Bookmarks", "Tweets", "a - b....md"]);
        assert_eq!(note_relative_path(None, "x....md"), PathBuf::from("x....md"));
    }
}

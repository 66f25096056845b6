use thiserror::Error;

#[derive(Debug, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// System clipboard as seen by the note writer.
pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Wiki-style link to a saved note, e.g. `[[Jane Doe - Hi....md]]`.
pub fn note_link(filename: &str) -> String {
    format!("[[{filename}]]")
}

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::persist::{PersistError, WriteOutcome};

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Writing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub job_id: JobId,
    pub stage: Stage,
}

#[derive(Debug)]
pub enum EngineEvent {
    Progress(JobProgress),
    JobCompleted {
        job_id: JobId,
        result: Result<SavedNote, SaveError>,
    },
}

/// Payload of an oEmbed response. Every field is optional on the wire and
/// degrades to an empty string; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmbedResult {
    #[serde(rename = "url", default, deserialize_with = "null_as_empty")]
    pub canonical_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author_url: String,
    #[serde(rename = "html", default, deserialize_with = "null_as_empty")]
    pub embed_html: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPost {
    pub canonical_url: String,
    pub author_name: String,
    pub author_url: String,
    pub body_text: String,
}

impl ExtractedPost {
    pub fn from_embed(embed: EmbedResult, body_text: String) -> Self {
        Self {
            canonical_url: embed.canonical_url,
            author_name: embed.author_name,
            author_url: embed.author_url,
            body_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedNote {
    /// Path relative to the vault root.
    pub relative_path: PathBuf,
    pub filename: String,
    pub outcome: WriteOutcome,
    pub clipboard_copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedBody,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Terminal failure of one save request.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("no tweet url given")]
    EmptyInput,
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("persist failed: {0}")]
    Persist(#[from] PersistError),
}

//! Tweet saver engine: fetch an oEmbed payload, extract the post body and
//! persist it as a note.
mod clipboard;
mod engine;
mod extract;
mod fetch;
mod filename;
mod frontmatter;
mod note;
mod persist;
mod pipeline;
mod retry;
mod settings;
mod types;

pub use clipboard::{note_link, ClipboardError, ClipboardSink};
pub use engine::EngineHandle;
pub use extract::{
    strip_trailing_short_link, EmbedTextExtractor, Extractor, DEFAULT_QUOTE_SELECTOR,
    EXTRACTION_ERROR_SENTINEL, MISSING_TEXT_SENTINEL,
};
pub use fetch::{oembed_request_url, FetchSettings, Fetcher, OembedFetcher, DEFAULT_OEMBED_ENDPOINT};
pub use filename::{
    folder_path, normalize_folder, note_filename, note_relative_path, sanitize_component,
    BODY_PREFIX_CHARS, NOTE_EXTENSION,
};
pub use frontmatter::render_note_document;
pub use note::{Clock, NoteWriter};
pub use persist::{ensure_dir, AtomicFileWriter, FsVault, PersistError, Vault, WriteOutcome};
pub use pipeline::{ChannelProgressSink, NoopProgressSink, ProgressSink, TweetSaver};
pub use retry::{RetryPolicy, RetryingFetcher, Sleeper, TokioSleeper};
pub use settings::{SaverSettings, DEFAULT_TWEETS_FOLDER};
pub use types::{
    EmbedResult, EngineEvent, ExtractedPost, FailureKind, FetchError, JobId, JobProgress,
    SaveError, SavedNote, Stage,
};

use std::sync::Arc;

use saver_logging::{saver_debug, saver_info, saver_warn};

use crate::extract::{EmbedTextExtractor, Extractor};
use crate::fetch::{FetchSettings, Fetcher, OembedFetcher};
use crate::note::NoteWriter;
use crate::persist::Vault;
use crate::retry::RetryingFetcher;
use crate::{
    EngineEvent, ExtractedPost, JobId, JobProgress, SaveError, SavedNote, SaverSettings, Stage,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Fetch, extract and persist one post.
pub struct TweetSaver {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    writer: NoteWriter,
}

impl TweetSaver {
    pub fn new(fetcher: Arc<dyn Fetcher>, extractor: Arc<dyn Extractor>, writer: NoteWriter) -> Self {
        Self {
            fetcher,
            extractor,
            writer,
        }
    }

    /// Retrying oEmbed fetcher, default extractor, plain note writer on `vault`.
    pub fn with_defaults(fetch_settings: FetchSettings, vault: Arc<dyn Vault>) -> Self {
        let policy = fetch_settings.retry;
        let fetcher = RetryingFetcher::new(OembedFetcher::new(fetch_settings), policy);
        Self::new(
            Arc::new(fetcher),
            Arc::new(EmbedTextExtractor::new()),
            NoteWriter::new(vault),
        )
    }

    /// A fetch failure ends the request before anything is written; an
    /// extraction problem only changes the body text.
    pub async fn save_post(
        &self,
        job_id: JobId,
        raw_url: &str,
        settings: &SaverSettings,
        sink: &dyn ProgressSink,
    ) -> Result<SavedNote, SaveError> {
        let url = raw_url.trim();
        if url.is_empty() {
            saver_warn!("Job {} rejected: empty tweet url", job_id);
            return Err(SaveError::EmptyInput);
        }
        saver_info!("Tweet URL: {}", url);

        emit_stage(sink, job_id, Stage::Fetching);
        let embed = self.fetcher.fetch(url).await?;
        saver_debug!(
            "Fetched embed: url={} author={} html_len={}",
            embed.canonical_url,
            embed.author_name,
            embed.embed_html.len()
        );

        emit_stage(sink, job_id, Stage::Extracting);
        let body_text = self.extractor.extract(&embed.embed_html);
        let post = ExtractedPost::from_embed(embed, body_text);
        saver_debug!("Extracted post: {:?}", post);

        emit_stage(sink, job_id, Stage::Writing);
        let saved = self.writer.save(&post, settings)?;

        emit_stage(sink, job_id, Stage::Done);
        Ok(saved)
    }
}

fn emit_stage(sink: &dyn ProgressSink, job_id: JobId, stage: Stage) {
    sink.emit(EngineEvent::Progress(JobProgress { job_id, stage }));
}

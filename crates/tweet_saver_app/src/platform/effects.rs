use std::time::Duration;

use saver_logging::{saver_error, saver_info, saver_warn};
use tweet_saver_core::{Effect, Msg, Notice, SaveResultKind, Stage};
use tweet_saver_engine::{EngineEvent, EngineHandle, SaveError, SavedNote, SaverSettings};

pub(crate) struct EffectRunner {
    engine: EngineHandle,
    settings: SaverSettings,
}

impl EffectRunner {
    pub(crate) fn new(engine: EngineHandle, settings: SaverSettings) -> Self {
        Self { engine, settings }
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SaveUrl { job_id, url } => {
                    saver_info!("SaveUrl job_id={} url={}", job_id, url);
                    self.engine.submit(job_id, url, self.settings.clone());
                }
                Effect::ShowNotice(notice) => show_notice(&notice),
            }
        }
    }

    /// Waits for the next engine event and turns it into a core message.
    pub(crate) fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        Some(match event {
            EngineEvent::Progress(progress) => Msg::SaveProgress {
                job_id: progress.job_id,
                stage: map_stage(progress.stage),
            },
            EngineEvent::JobCompleted { job_id, result } => Msg::SaveDone {
                job_id,
                result: map_result(job_id, result),
            },
        })
    }
}

fn show_notice(notice: &Notice) {
    match notice {
        Notice::Saved { path } => println!("{} ({})", notice.message(), path),
        other if other.is_failure() => eprintln!("{}", other.message()),
        other => println!("{}", other.message()),
    }
}

fn map_result(job_id: u64, result: Result<SavedNote, SaveError>) -> SaveResultKind {
    match result {
        Ok(saved) => SaveResultKind::Saved {
            path: saved.relative_path.display().to_string(),
        },
        Err(SaveError::EmptyInput) => SaveResultKind::EmptyInput,
        Err(SaveError::Fetch(err)) => {
            saver_warn!("Job {} failed to fetch: {}", job_id, err);
            SaveResultKind::FetchFailed
        }
        Err(SaveError::Persist(err)) => {
            saver_error!("Job {} failed to save note: {}", job_id, err);
            SaveResultKind::SaveFailed
        }
    }
}

fn map_stage(stage: tweet_saver_engine::Stage) -> Stage {
    match stage {
        tweet_saver_engine::Stage::Fetching => Stage::Fetching,
        tweet_saver_engine::Stage::Extracting => Stage::Extracting,
        tweet_saver_engine::Stage::Writing => Stage::Writing,
        tweet_saver_engine::Stage::Done => Stage::Done,
    }
}

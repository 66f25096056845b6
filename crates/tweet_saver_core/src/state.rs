use crate::view_model::{AppViewModel, JobView};
use crate::Notice;

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Queued,
    Fetching,
    Extracting,
    Writing,
    Done,
}

/// How a save ended, as far as the operator needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResultKind {
    Saved { path: String },
    FetchFailed,
    SaveFailed,
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    job_id: JobId,
    url: String,
    stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    last_job_id: JobId,
    in_flight: Option<InFlight>,
    last_notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            in_flight: self.in_flight.as_ref().map(|job| JobView {
                job_id: job.job_id,
                url: job.url.clone(),
                stage: job.stage,
            }),
            last_notice: self.last_notice.clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns whether the view changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn start_job(&mut self, url: String) -> JobId {
        self.last_job_id += 1;
        let job_id = self.last_job_id;
        self.in_flight = Some(InFlight {
            job_id,
            url,
            stage: Stage::Queued,
        });
        self.dirty = true;
        job_id
    }

    pub(crate) fn apply_progress(&mut self, job_id: JobId, stage: Stage) -> bool {
        match self.in_flight.as_mut() {
            Some(job) if job.job_id == job_id => {
                job.stage = stage;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Clears the in-flight job if `job_id` matches it.
    pub(crate) fn finish_job(&mut self, job_id: JobId) -> bool {
        match self.in_flight.as_ref() {
            Some(job) if job.job_id == job_id => {
                self.in_flight = None;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.last_notice = Some(notice);
        self.dirty = true;
    }
}

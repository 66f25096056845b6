use crate::{JobId, Notice, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub in_flight: Option<JobView>,
    pub last_notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub job_id: JobId,
    pub url: String,
    pub stage: Stage,
}

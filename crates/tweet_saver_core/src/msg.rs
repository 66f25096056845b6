#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator submitted the URL prompt.
    UrlSubmitted(String),
    /// Engine progress for the in-flight save.
    SaveProgress {
        job_id: crate::JobId,
        stage: crate::Stage,
    },
    /// Engine completion for a save.
    SaveDone {
        job_id: crate::JobId,
        result: crate::SaveResultKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the fetch-extract-persist pipeline for `url`.
    SaveUrl { job_id: crate::JobId, url: String },
    /// Show a transient status message to the operator.
    ShowNotice(Notice),
}

/// Operator-facing status. Only a short category reaches the operator; error
/// details stay in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    FetchInProgress,
    Saved { path: String },
    FetchFailed,
    SaveFailed,
    EmptyInputRejected,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::FetchInProgress => "Fetching tweet data...",
            Notice::Saved { .. } => "Tweet saved successfully!",
            Notice::FetchFailed => "Error fetching tweet data",
            Notice::SaveFailed => "Error saving tweet",
            Notice::EmptyInputRejected => "Please enter a valid tweet URL",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Notice::FetchFailed | Notice::SaveFailed | Notice::EmptyInputRejected
        )
    }
}

use crate::{AppState, Effect, Msg, Notice, SaveResultKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlSubmitted(raw) => {
            let url = raw.trim();
            if url.is_empty() {
                state.set_notice(Notice::EmptyInputRejected);
                return (state, vec![Effect::ShowNotice(Notice::EmptyInputRejected)]);
            }
            // One save at a time; a second submission while busy is dropped.
            if state.is_busy() {
                return (state, Vec::new());
            }
            let job_id = state.start_job(url.to_string());
            state.set_notice(Notice::FetchInProgress);
            vec![
                Effect::ShowNotice(Notice::FetchInProgress),
                Effect::SaveUrl {
                    job_id,
                    url: url.to_string(),
                },
            ]
        }
        Msg::SaveProgress { job_id, stage } => {
            state.apply_progress(job_id, stage);
            Vec::new()
        }
        Msg::SaveDone { job_id, result } => {
            if !state.finish_job(job_id) {
                return (state, Vec::new());
            }
            let notice = match result {
                SaveResultKind::Saved { path } => Notice::Saved { path },
                SaveResultKind::FetchFailed => Notice::FetchFailed,
                SaveResultKind::SaveFailed => Notice::SaveFailed,
                SaveResultKind::EmptyInput => Notice::EmptyInputRejected,
            };
            state.set_notice(notice.clone());
            vec![Effect::ShowNotice(notice)]
        }
    };

    (state, effects)
}

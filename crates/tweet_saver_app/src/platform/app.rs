use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use log::LevelFilter;
use saver_logging::{saver_info, LogDestination, DEFAULT_LOG_FILE};
use tweet_saver_core::{update, AppState, Msg, Stage};
use tweet_saver_engine::{
    EmbedTextExtractor, EngineHandle, FetchSettings, FsVault, NoteWriter, OembedFetcher,
    RetryingFetcher, TweetSaver,
};

use super::clipboard::SystemClipboard;
use super::effects::EffectRunner;
use super::persistence::load_settings;
use crate::cli::Cli;

/// Upper bound on the wait for any single engine event. A save is bounded by
/// attempts x (request timeout + retry delay), well below this.
const EVENT_TIMEOUT: Duration = Duration::from_secs(300);

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let destination = if cli.verbose {
        LogDestination::Both(DEFAULT_LOG_FILE.into())
    } else {
        LogDestination::File(DEFAULT_LOG_FILE.into())
    };
    saver_logging::initialize(destination, LevelFilter::Info);

    let vault_root = cli.vault.clone();
    let mut settings = load_settings(&vault_root);
    if let Some(folder) = cli.folder.clone() {
        settings.tweets_folder = folder;
    }
    if cli.no_clipboard {
        settings.copy_path_to_clipboard = false;
    }
    saver_info!("Vault root {:?}, settings {:?}", vault_root, settings);

    let fetch_settings = FetchSettings::default();
    let policy = fetch_settings.retry;
    let writer = NoteWriter::new(Arc::new(FsVault::new(vault_root)))
        .with_clipboard(Arc::new(SystemClipboard));
    let saver = TweetSaver::new(
        Arc::new(RetryingFetcher::new(OembedFetcher::new(fetch_settings), policy)),
        Arc::new(EmbedTextExtractor::new()),
        writer,
    );
    let engine = EngineHandle::new(saver).context("starting engine thread")?;
    let runner = EffectRunner::new(engine, settings);

    let raw_url = match cli.url {
        Some(url) => url,
        None => prompt_for_url().context("reading tweet url")?,
    };

    let (mut state, effects) = update(AppState::new(), Msg::UrlSubmitted(raw_url));
    runner.run(effects);
    render_progress(&mut state, cli.verbose);

    while state.is_busy() {
        let Some(msg) = runner.next_msg(EVENT_TIMEOUT) else {
            bail!("engine stopped responding");
        };
        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);
        render_progress(&mut state, cli.verbose);
    }

    let failed = state
        .view()
        .last_notice
        .is_some_and(|notice| notice.is_failure());
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Prints the in-flight stage whenever the view changed. Quiet unless verbose.
fn render_progress(state: &mut AppState, verbose: bool) {
    if !state.consume_dirty() || !verbose {
        return;
    }
    if let Some(job) = state.view().in_flight {
        eprintln!("[job {}] {}", job.job_id, stage_label(job.stage));
    }
}

fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Queued => "queued",
        Stage::Fetching => "fetching embed",
        Stage::Extracting => "extracting text",
        Stage::Writing => "writing note",
        Stage::Done => "done",
    }
}

fn prompt_for_url() -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Tweet URL: ")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_progress_consumes_dirty_flag_even_when_quiet() {
        let (mut state, _) = update(
            AppState::new(),
            Msg::UrlSubmitted("https://twitter.com/a/status/1".to_string()),
        );
        render_progress(&mut state, false);
        assert!(!state.consume_dirty());
    }

    #[test]
    fn stage_labels_are_distinct() {
        let labels = [
            Stage::Queued,
            Stage::Fetching,
            Stage::Extracting,
            Stage::Writing,
            Stage::Done,
        ]
        .map(stage_label);
        for (i, label) in labels.iter().enumerate() {
            assert!(!labels[i + 1..].contains(label));
        }
    }
}

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use saver_logging::saver_debug;

use crate::pipeline::{ChannelProgressSink, TweetSaver};
use crate::{EngineEvent, JobId, SaverSettings};

enum EngineCommand {
    Save {
        job_id: JobId,
        url: String,
        settings: SaverSettings,
    },
}

/// Runs a [`TweetSaver`] on a background thread.
///
/// Requests are handled one at a time in submission order; progress and
/// completion come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(saver: TweetSaver) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("tweet-saver-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    runtime.block_on(handle_command(&saver, command, &event_tx));
                }
                saver_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, job_id: JobId, url: impl Into<String>, settings: SaverSettings) {
        let _ = self.cmd_tx.send(EngineCommand::Save {
            job_id,
            url: url.into(),
            settings,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    saver: &TweetSaver,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Save {
            job_id,
            url,
            settings,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = saver.save_post(job_id, &url, &settings, &sink).await;
            let _ = event_tx.send(EngineEvent::JobCompleted { job_id, result });
        }
    }
}

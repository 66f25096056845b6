use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tweet_saver_engine::{
    EmbedResult, FailureKind, FetchError, Fetcher, RetryPolicy, RetryingFetcher, Sleeper,
};

/// Fails the first `failures` calls, then succeeds.
struct ScriptedFetcher {
    failures: u32,
    calls: Arc<AtomicU32>,
}

impl ScriptedFetcher {
    fn new(failures: u32) -> (Self, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        (
            Self {
                failures,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<EmbedResult, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(FetchError::new(
                FailureKind::HttpStatus(500 + call as u16),
                format!("attempt {call}"),
            ));
        }
        Ok(EmbedResult {
            canonical_url: url.to_string(),
            ..EmbedResult::default()
        })
    }
}

#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        delay: Duration::from_millis(2000),
    }
}

#[tokio::test]
async fn succeeds_when_failures_stay_below_ceiling() {
    for failures in 0..3 {
        let (inner, calls) = ScriptedFetcher::new(failures);
        let sleeper = Arc::new(RecordingSleeper::default());
        let fetcher = RetryingFetcher::with_sleeper(inner, policy(3), sleeper.clone());

        let embed = fetcher.fetch("https://twitter.com/a/status/1").await;
        assert!(embed.is_ok(), "failures={failures}");
        assert_eq!(calls.load(Ordering::SeqCst), failures + 1);
        assert_eq!(sleeper.delays().len(), failures as usize);
    }
}

#[tokio::test]
async fn fails_when_failures_reach_ceiling() {
    let (inner, calls) = ScriptedFetcher::new(3);
    let sleeper = Arc::new(RecordingSleeper::default());
    let fetcher = RetryingFetcher::with_sleeper(inner, policy(3), sleeper.clone());

    let err = fetcher.fetch("https://twitter.com/a/status/1").await.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.message, "attempt 3");
}

#[tokio::test]
async fn always_failing_sleeps_between_attempts_only() {
    let (inner, calls) = ScriptedFetcher::new(u32::MAX);
    let sleeper = Arc::new(RecordingSleeper::default());
    let fetcher = RetryingFetcher::with_sleeper(inner, policy(5), sleeper.clone());

    let err = fetcher.fetch("https://twitter.com/a/status/1").await.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(err.message, "attempt 5");
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(2000); 4]);
}

#[tokio::test]
async fn zero_ceiling_still_makes_one_attempt() {
    let (inner, calls) = ScriptedFetcher::new(u32::MAX);
    let sleeper = Arc::new(RecordingSleeper::default());
    let fetcher = RetryingFetcher::with_sleeper(inner, policy(0), sleeper.clone());

    assert!(fetcher.fetch("https://twitter.com/a/status/1").await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(sleeper.delays().is_empty());
}

#[test]
fn default_policy_is_three_attempts_two_seconds_apart() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay, Duration::from_millis(2000));
}

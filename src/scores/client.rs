//! Score sync client
//!
//! Submits finished runs to the leaderboard service with fixed-delay retries
//! and falls back to the local list when the service can't be reached. Every
//! public operation returns a structured outcome; network errors never escape.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::local::{LocalScores, MAX_LOCAL_RECORDS, PlayerStats};
use super::record::{Origin, ScoreRecord, Source, sort_by_score_desc};
use super::retry::{RetryPolicy, Sleeper};
use super::transport::{HttpTransport, LeaderboardTransport, TransportError};
use super::validate::{ValidationError, validate_submission};
use crate::persistence::{KeyValueStore, StorageError};
use crate::platform::PlatformSleeper;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root, e.g. `http://localhost:3000/api`
    pub base_url: String,
    /// Attempts after the first
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    /// Records kept in the local list
    pub max_local_records: usize,
    /// Default leaderboard size
    pub leaderboard_limit: usize,
    /// Per-request timeout (native only)
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            max_retries: 3,
            retry_delay_ms: 1000,
            max_local_records: MAX_LOCAL_RECORDS,
            leaderboard_limit: 10,
            request_timeout_ms: 5000,
        }
    }
}

impl ClientConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// A stored submission and where it ended up
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub record: ScoreRecord,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    /// Best first, at most the requested limit
    pub entries: Vec<ScoreRecord>,
    pub source: Source,
}

/// One record that could not be synced
#[derive(Debug, Clone, PartialEq)]
pub struct SyncFailure {
    pub record: ScoreRecord,
    pub error: String,
}

/// Outcome of pushing local records to the service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub attempted: usize,
    pub synced: usize,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// True when nothing failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub available: bool,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Remote failed and the local fallback failed too
    #[error("score could not be saved: {0}")]
    LocalStore(#[source] StorageError),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("local scores unavailable: {0}")]
    LocalStore(#[from] StorageError),
}

/// Leaderboard client over a transport, a local store and a timer
pub struct ScoreClient<T, K, S> {
    transport: T,
    sleeper: S,
    local: Mutex<LocalScores<K>>,
    config: ClientConfig,
}

impl<K: KeyValueStore> ScoreClient<HttpTransport, K, PlatformSleeper> {
    /// HTTP client on the platform timer
    pub fn http(config: ClientConfig, store: K) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(
            &config.base_url,
            Duration::from_millis(config.request_timeout_ms),
        )?;
        Ok(Self::new(config, transport, store, PlatformSleeper::default()))
    }
}

impl<T, K, S> ScoreClient<T, K, S>
where
    T: LeaderboardTransport,
    K: KeyValueStore,
    S: Sleeper,
{
    pub fn new(config: ClientConfig, transport: T, store: K, sleeper: S) -> Self {
        Self {
            transport,
            sleeper,
            local: Mutex::new(LocalScores::new(store, config.max_local_records)),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Serialises every local-list read-modify-write. Never held across an await.
    fn local(&self) -> MutexGuard<'_, LocalScores<K>> {
        self.local.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a finished run.
    ///
    /// Invalid input is rejected before any network or storage work. If every
    /// attempt fails the record is kept locally and the call still succeeds
    /// with `Source::Local`.
    pub async fn submit(
        &self,
        player_name: &str,
        score: i64,
        level: i64,
    ) -> Result<Submission, SubmitError> {
        let valid = validate_submission(player_name, score, level)?;
        let record = ScoreRecord {
            player_name: valid.player_name,
            score: valid.score,
            level: valid.level,
            timestamp: Utc::now(),
            origin: Origin::Remote,
        };

        let body = record.submission();
        let (transport, body) = (&self.transport, &body);
        let remote = self
            .config
            .retry_policy()
            .run(&self.sleeper, "Score submit", move || transport.submit(body))
            .await;

        match remote {
            Ok(()) => {
                log::info!("Score {} for {} saved on server", record.score, record.player_name);
                Ok(Submission {
                    record,
                    source: Source::Remote,
                })
            }
            Err(e) => {
                log::info!("Server unavailable ({}), saving score locally", e);
                let record = ScoreRecord {
                    origin: Origin::Local,
                    ..record
                };
                match self.local().insert(record.clone()) {
                    Ok(_) => Ok(Submission {
                        record,
                        source: Source::Local,
                    }),
                    Err(e) => {
                        log::error!("Could not save score locally: {}", e);
                        Err(SubmitError::LocalStore(e))
                    }
                }
            }
        }
    }

    /// Best `limit` scores, from the service when reachable
    pub async fn leaderboard(&self, limit: usize) -> Result<Leaderboard, ClientError> {
        let transport = &self.transport;
        let remote = self
            .config
            .retry_policy()
            .run(&self.sleeper, "Leaderboard fetch", move || {
                transport.fetch_top(limit)
            })
            .await;

        match remote {
            Ok(mut entries) => {
                for entry in &mut entries {
                    entry.origin = Origin::Remote;
                }
                sort_by_score_desc(&mut entries);
                entries.truncate(limit);
                Ok(Leaderboard {
                    entries,
                    source: Source::Remote,
                })
            }
            Err(e) => {
                log::info!("Server unavailable ({}), using local leaderboard", e);
                let entries = self.local().top(limit).map_err(|e| {
                    log::error!("Could not read local scores: {}", e);
                    ClientError::LocalStore(e)
                })?;
                Ok(Leaderboard {
                    entries,
                    source: Source::Local,
                })
            }
        }
    }

    /// Leaderboard with the configured default size
    pub async fn default_leaderboard(&self) -> Result<Leaderboard, ClientError> {
        self.leaderboard(self.config.leaderboard_limit).await
    }

    /// Push every local-only record to the service, one at a time.
    /// Successes are marked as remote; per-record failures are collected in
    /// the report. Only an unreadable local list fails the whole call.
    pub async fn sync_local_scores(&self) -> Result<SyncReport, ClientError> {
        let pending = self.local().local_only().map_err(|e| {
            log::error!("Could not read local scores for sync: {}", e);
            ClientError::LocalStore(e)
        })?;
        if pending.is_empty() {
            log::info!("No local scores to sync");
            return Ok(SyncReport::default());
        }

        log::info!("Syncing {} local score(s)...", pending.len());
        let policy = self.config.retry_policy();
        let mut report = SyncReport {
            attempted: pending.len(),
            ..SyncReport::default()
        };
        let mut synced = Vec::new();
        let transport = &self.transport;

        for record in pending {
            let body = &record.submission();
            match policy
                .run(&self.sleeper, "Score sync", move || transport.submit(body))
                .await
            {
                Ok(()) => synced.push(record),
                Err(e) => report.failures.push(SyncFailure {
                    record,
                    error: e.to_string(),
                }),
            }
        }

        report.synced = synced.len();
        if let Err(e) = self.local().promote(&synced) {
            log::warn!("Synced scores could not be marked remote: {}", e);
        }
        log::info!(
            "Sync finished: {} ok, {} failed",
            report.synced,
            report.failures.len()
        );
        Ok(report)
    }

    /// Single health probe, no retries
    pub async fn check_server_status(&self) -> ServerStatus {
        let transport = &self.transport;
        match RetryPolicy::once()
            .run(&self.sleeper, "Health check", move || transport.health())
            .await
        {
            Ok(()) => ServerStatus {
                available: true,
                message: "Server available".to_string(),
            },
            Err(e) => ServerStatus {
                available: false,
                message: e.to_string(),
            },
        }
    }

    /// Best `limit` locally stored records
    pub fn local_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, StorageError> {
        self.local().top(limit)
    }

    pub fn clear_local_scores(&self) -> Result<(), StorageError> {
        self.local().clear()
    }

    pub fn player_stats(&self) -> Result<PlayerStats, StorageError> {
        self.local().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::scores::record::ScoreSubmission;
    use crate::scores::retry::tests::RecordingSleeper;
    use std::cell::{Cell, RefCell};

    /// Scripted service: fails the first `failures` submit calls
    #[derive(Default)]
    struct FakeService {
        failures: Cell<usize>,
        down: bool,
        submit_calls: Cell<usize>,
        fetch_calls: Cell<usize>,
        stored: RefCell<Vec<ScoreSubmission>>,
        top: Vec<ScoreRecord>,
    }

    impl FakeService {
        fn down() -> Self {
            Self {
                down: true,
                ..Self::default()
            }
        }
    }

    impl LeaderboardTransport for FakeService {
        async fn submit(&self, entry: &ScoreSubmission) -> Result<(), TransportError> {
            self.submit_calls.set(self.submit_calls.get() + 1);
            if self.down {
                return Err(TransportError::Unavailable("connection refused".into()));
            }
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(TransportError::Status(500));
            }
            self.stored.borrow_mut().push(entry.clone());
            Ok(())
        }

        async fn fetch_top(&self, _limit: usize) -> Result<Vec<ScoreRecord>, TransportError> {
            self.fetch_calls.set(self.fetch_calls.get() + 1);
            if self.down {
                return Err(TransportError::Unavailable("connection refused".into()));
            }
            Ok(self.top.clone())
        }

        async fn health(&self) -> Result<(), TransportError> {
            if self.down {
                Err(TransportError::Status(503))
            } else {
                Ok(())
            }
        }
    }

    fn client(
        service: FakeService,
        store: MemoryStore,
    ) -> ScoreClient<FakeService, MemoryStore, RecordingSleeper> {
        ScoreClient::new(
            ClientConfig::default(),
            service,
            store,
            RecordingSleeper::default(),
        )
    }

    fn local_record(name: &str, score: u64) -> ScoreRecord {
        ScoreRecord {
            player_name: name.into(),
            score,
            level: 1,
            timestamp: Utc::now(),
            origin: Origin::Local,
        }
    }

    #[tokio::test]
    async fn test_submit_remote_success() {
        let client = client(FakeService::default(), MemoryStore::new());
        let submission = client.submit("Al", 150, 2).await.unwrap();

        assert_eq!(submission.source, Source::Remote);
        assert_eq!(submission.record.origin, Origin::Remote);
        assert_eq!(client.transport().stored.borrow().len(), 1);
        assert!(client.local_scores(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_recovers_within_retry_budget() {
        let service = FakeService {
            failures: Cell::new(2),
            ..FakeService::default()
        };
        let client = client(service, MemoryStore::new());
        let submission = client.submit("Al", 150, 2).await.unwrap();

        assert_eq!(submission.source, Source::Remote);
        assert_eq!(client.transport().submit_calls.get(), 3);
        assert_eq!(client.sleeper.delays.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_falls_back_to_local() {
        let client = client(FakeService::down(), MemoryStore::new());
        let submission = client.submit("Al", 150, 2).await.unwrap();

        assert_eq!(submission.source, Source::Local);
        assert_eq!(client.transport().submit_calls.get(), 4);
        assert_eq!(
            *client.sleeper.delays.borrow(),
            vec![Duration::from_millis(1000); 3]
        );

        let local = client.local_scores(10).unwrap();
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].player_name, "Al");
        assert_eq!(local[0].score, 150);
        assert_eq!(local[0].level, 2);
        assert_eq!(local[0].origin, Origin::Local);
    }

    #[tokio::test]
    async fn test_invalid_submission_never_touches_network_or_store() {
        let client = client(FakeService::down(), MemoryStore::new());
        let err = client.submit("", 10, 1).await.unwrap_err();

        assert!(matches!(err, SubmitError::Validation(_)));
        assert!(err.to_string().contains("name is required"));
        assert_eq!(client.transport().submit_calls.get(), 0);
        assert!(client.local_scores(10).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_store_failure_is_reported() {
        let client = client(FakeService::down(), MemoryStore::read_only());
        let err = client.submit("Al", 150, 2).await.unwrap_err();
        assert!(matches!(err, SubmitError::LocalStore(_)));
    }

    #[tokio::test]
    async fn test_leaderboard_falls_back_to_local_top() {
        let client = client(FakeService::down(), MemoryStore::new());
        for score in [50, 200, 75, 10] {
            client.submit("Al", score, 1).await.unwrap();
        }

        let board = client.leaderboard(3).await.unwrap();
        assert_eq!(board.source, Source::Local);
        let scores: Vec<u64> = board.entries.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![200, 75, 50]);
    }

    #[tokio::test]
    async fn test_leaderboard_reports_unreadable_local_store() {
        let client = client(FakeService::down(), MemoryStore::unavailable());
        let err = client.leaderboard(3).await.unwrap_err();
        assert!(matches!(err, ClientError::LocalStore(StorageError::Unavailable(_))));
        // The remote was tried with the full budget first
        assert_eq!(client.transport().fetch_calls.get(), 4);
    }

    #[tokio::test]
    async fn test_remote_leaderboard_is_sorted_and_limited() {
        let service = FakeService {
            top: vec![
                local_record("a", 10),
                local_record("b", 900),
                local_record("c", 300),
            ],
            ..FakeService::default()
        };
        let client = client(service, MemoryStore::new());

        let board = client.leaderboard(2).await.unwrap();
        assert_eq!(board.source, Source::Remote);
        let scores: Vec<u64> = board.entries.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![900, 300]);
        assert!(board.entries.iter().all(|r| r.origin == Origin::Remote));
        assert_eq!(client.transport().fetch_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_sync_promotes_and_reports_partial_failures() {
        let mut store = MemoryStore::new();
        {
            let mut local = LocalScores::new(&mut store, MAX_LOCAL_RECORDS);
            for (name, score) in [("a", 30), ("b", 20), ("c", 10)] {
                local.insert(local_record(name, score)).unwrap();
            }
        }

        // First record burns all four attempts, the rest go through
        let service = FakeService {
            failures: Cell::new(4),
            ..FakeService::default()
        };
        let client = client(service, store);
        let report = client.sync_local_scores().await.unwrap();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.synced, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].record.player_name, "a");
        assert!(!report.is_complete());

        let pending = client.local_scores(10).unwrap();
        let still_local: Vec<&str> = pending
            .iter()
            .filter(|r| r.is_local())
            .map(|r| r.player_name.as_str())
            .collect();
        assert_eq!(still_local, vec!["a"]);

        // Second pass only retries what is left
        let report = client.sync_local_scores().await.unwrap();
        assert_eq!(report.attempted, 1);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_sync_with_nothing_pending() {
        let client = client(FakeService::default(), MemoryStore::new());
        let report = client.sync_local_scores().await.unwrap();
        assert_eq!(report, SyncReport::default());
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_sync_reports_unreadable_local_store() {
        let client = client(FakeService::default(), MemoryStore::unavailable());
        let err = client.sync_local_scores().await.unwrap_err();
        assert!(matches!(err, ClientError::LocalStore(_)));
        assert_eq!(client.transport().submit_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_fallbacks_are_not_lost() {
        let client = client(FakeService::down(), MemoryStore::new());
        let (a, b, c) = tokio::join!(
            client.submit("a", 1, 1),
            client.submit("b", 2, 1),
            client.submit("c", 3, 1),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(client.local_scores(10).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_server_status_single_attempt() {
        let client = client(FakeService::down(), MemoryStore::new());
        let status = client.check_server_status().await;
        assert!(!status.available);
        assert_eq!(status.message, "HTTP 503");
        assert!(client.sleeper.delays.borrow().is_empty());

        let client = self::client(FakeService::default(), MemoryStore::new());
        assert!(client.check_server_status().await.available);
    }

    #[tokio::test]
    async fn test_clear_and_stats() {
        let client = client(FakeService::down(), MemoryStore::new());
        client.submit("Al", 150, 2).await.unwrap();
        client.submit("Al", 50, 1).await.unwrap();
        assert_eq!(client.player_stats().unwrap().best_score, 150);

        client.clear_local_scores().unwrap();
        assert_eq!(client.player_stats().unwrap().total_games, 0);
    }
}

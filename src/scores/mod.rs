//! Leaderboard sync
//!
//! Sends finished runs to a remote leaderboard service and keeps a local
//! list as a fallback. Independent of `sim`: callers pass in plain
//! name/score/level values.

pub mod client;
pub mod format;
pub mod gate;
pub mod local;
pub mod record;
pub mod retry;
pub mod transport;
pub mod validate;

pub use client::{
    ClientConfig, ClientError, Leaderboard, ScoreClient, ServerStatus, SubmitError, Submission,
    SyncFailure, SyncReport,
};
pub use format::{format_relative_date, format_score};
pub use gate::SubmitGate;
pub use local::{LOCAL_SCORES_KEY, LocalScores, MAX_LOCAL_RECORDS, PlayerStats};
pub use record::{Origin, ScoreRecord, ScoreSubmission, Source};
pub use retry::{RetryPolicy, Sleeper};
pub use transport::{HttpTransport, LeaderboardTransport, TransportError};
pub use validate::{MAX_NAME_LEN, ValidSubmission, ValidationError, Violation, validate_submission};

//! Submission validation
//!
//! Runs before any network or storage work and reports every broken rule.

use std::fmt;

use thiserror::Error;

/// Longest accepted player name, in characters after trimming
pub const MAX_NAME_LEN: usize = 20;

/// A single broken rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    NameRequired,
    NameTooLong { max: usize, actual: usize },
    /// Only letters, digits, spaces, `-` and `_` are allowed
    NameInvalidChars,
    ScoreNegative(i64),
    LevelNotPositive(i64),
    LevelOutOfRange(i64),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NameRequired => write!(f, "player name is required"),
            Violation::NameTooLong { max, actual } => {
                write!(f, "player name must be at most {max} characters (got {actual})")
            }
            Violation::NameInvalidChars => write!(
                f,
                "player name may only contain letters, numbers, spaces, hyphens and underscores"
            ),
            Violation::ScoreNegative(score) => {
                write!(f, "score must be a non-negative integer (got {score})")
            }
            Violation::LevelNotPositive(level) => {
                write!(f, "level must be an integer greater than 0 (got {level})")
            }
            Violation::LevelOutOfRange(level) => write!(f, "level {level} is out of range"),
        }
    }
}

/// All rules a submission broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid score submission: {}", join(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    /// Trimmed
    pub player_name: String,
    pub score: u64,
    pub level: u32,
}

fn allowed_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || c == '_' || c == '-'
}

/// Check a name/score/level triple
pub fn validate_submission(
    player_name: &str,
    score: i64,
    level: i64,
) -> Result<ValidSubmission, ValidationError> {
    let mut violations = Vec::new();

    let name = player_name.trim();
    if name.is_empty() {
        violations.push(Violation::NameRequired);
    } else {
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            violations.push(Violation::NameTooLong {
                max: MAX_NAME_LEN,
                actual: len,
            });
        }
        if !name.chars().all(allowed_name_char) {
            violations.push(Violation::NameInvalidChars);
        }
    }

    if score < 0 {
        violations.push(Violation::ScoreNegative(score));
    }

    let level_ok = if level < 1 {
        violations.push(Violation::LevelNotPositive(level));
        None
    } else {
        let converted = u32::try_from(level).ok();
        if converted.is_none() {
            violations.push(Violation::LevelOutOfRange(level));
        }
        converted
    };

    match (violations.is_empty(), level_ok) {
        (true, Some(level)) => Ok(ValidSubmission {
            player_name: name.to_string(),
            score: score as u64,
            level,
        }),
        _ => Err(ValidationError { violations }),
    }
}

//! Leaderboard display helpers

use chrono::{DateTime, Utc};

/// Score with thousands separators, e.g. `12,345`
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a timestamp relative to `now`
pub fn format_relative_date(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - timestamp).num_days();
    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        _ => timestamp.format("%-m/%-d/%y").to_string(),
    }
}

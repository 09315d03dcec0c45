use chrono::DateTime;
use chrono_tz::Tz;

/// One validated game, independent of the source's raw field naming.
/// `start` carries the Eastern wall-clock time as published by the site.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedGame {
    pub start: DateTime<Tz>,
    pub home_team: String,
    pub away_team: String,
    pub rink: String,
    // Present only when the source reported both sides as numbers;
    // absent means not yet played or unknown, not 0-0.
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
}

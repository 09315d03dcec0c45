use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Timelike};
use chrono_tz::America::Toronto;
use serde_json::{Map, Value};

use crate::model::game::NormalizedGame;
use crate::season::SeasonYears;

// Alias keys probed per logical field, in order. The source spells its field
// names differently across deployments; each list covers the camelCase,
// PascalCase, lowercase and uppercase forms seen in the wild.
const DATE_ALIASES: &[&str] = &["gameDate", "GameDate", "gamedate", "GAMEDATE", "date", "Date", "DATE"];
const TIME_ALIASES: &[&str] = &["gameTime", "GameTime", "gametime", "GAMETIME", "time", "Time", "TIME"];
const RINK_ALIASES: &[&str] = &[
    "rinkName", "RinkName", "rinkname", "RINKNAME", "rink", "Rink", "RINK",
    "location", "Location", "LOCATION", "facility", "Facility", "FACILITY",
];
const HOME_TEAM_ALIASES: &[&str] = &[
    "homeTeamName", "HomeTeamName", "hometeamname", "HOMETEAMNAME",
    "homeTeam", "HomeTeam", "hometeam", "HOMETEAM", "home", "Home", "HOME",
];
const AWAY_TEAM_ALIASES: &[&str] = &[
    "awayTeamName", "AwayTeamName", "awayteamname", "AWAYTEAMNAME",
    "awayTeam", "AwayTeam", "awayteam", "AWAYTEAM", "away", "Away", "AWAY",
];
const HOME_SCORE_ALIASES: &[&str] = &[
    "homeScore", "HomeScore", "homescore", "HOMESCORE",
    "homeGoals", "HomeGoals", "homegoals", "HOMEGOALS", "hg", "HG",
];
const AWAY_SCORE_ALIASES: &[&str] = &[
    "awayScore", "AwayScore", "awayscore", "AWAYSCORE",
    "awayGoals", "AwayGoals", "awaygoals", "AWAYGOALS", "ag", "AG",
];

/// Probe `aliases` against the raw item in order and return the first present
/// value as a trimmed string. Scalars other than strings are formatted; null
/// counts as missing.
fn get_field(raw: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    for key in aliases {
        match raw.get(*key) {
            Some(Value::String(s)) => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            Some(Value::Bool(b)) => return Some(b.to_string()),
            Some(Value::Null) | None => continue,
            Some(_) => continue,
        }
    }
    None
}

/// Parse a date string into an absolute date. The site publishes yearless
/// "Mon DD" dates; the year comes from the season mapping. Formats that
/// already carry a year are accepted as-is.
fn parse_date(date_str: &str, season: &SeasonYears) -> Option<NaiveDate> {
    let s = date_str.trim();

    // chrono cannot parse a date with no year, so parse against a leap dummy
    // year first and substitute the season-resolved year after.
    for fmt in ["%b %d %Y", "%B %d %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{s} 2000"), fmt) {
            return NaiveDate::from_ymd_opt(season.year_for_month(d.month()), d.month(), d.day());
        }
    }

    for fmt in ["%m/%d/%Y", "%Y-%m-%d", "%d/%m/%Y", "%m-%d-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    None
}

/// Parse a clock time, returning (hour, minute) in 24-hour form.
/// Accepts 12-hour AM/PM forms, 24-hour "HH:MM", and bare hours like "7 PM".
fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let s = time_str.trim().to_uppercase();
    // "7 PM" has no minutes; chrono needs them
    let s = if !s.contains(':') {
        s.replace(" AM", ":00 AM").replace(" PM", ":00 PM")
    } else {
        s
    };

    for fmt in ["%I:%M %p", "%I:%M%p", "%I:%M:%S %p", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(&s, fmt) {
            return Some((t.hour(), t.minute()));
        }
    }
    None
}

fn parse_score(value: Option<String>) -> Option<i64> {
    value.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Convert one raw schedule item into a [`NormalizedGame`], or a skip reason.
///
/// Skips never escalate: the caller logs the reason, counts it, and moves on
/// to the next item.
pub fn parse_game(raw: &Map<String, Value>, season: &SeasonYears) -> Result<NormalizedGame, String> {
    let date_str = get_field(raw, DATE_ALIASES).ok_or("record has no date field")?;
    let time_str = get_field(raw, TIME_ALIASES).ok_or("record has no time field")?;

    let home_team = get_field(raw, HOME_TEAM_ALIASES).unwrap_or_default();
    let away_team = get_field(raw, AWAY_TEAM_ALIASES).unwrap_or_default();
    if home_team.is_empty() && away_team.is_empty() {
        return Err("record has no team names".to_string());
    }

    let date = parse_date(&date_str, season)
        .ok_or_else(|| format!("could not parse date '{}'", date_str))?;
    let (hour, minute) = parse_time(&time_str)
        .ok_or_else(|| format!("could not parse time '{}'", time_str))?;

    let naive = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| format!("invalid time of day {}:{:02}", hour, minute))?;
    // The site publishes Eastern wall-clock times; attach the zone, don't convert.
    let start = Toronto
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("{} does not exist in America/Toronto", naive))?;

    // Both-or-neither: a half-reported score means the game result is unknown.
    let (home_score, away_score) = match (
        parse_score(get_field(raw, HOME_SCORE_ALIASES)),
        parse_score(get_field(raw, AWAY_SCORE_ALIASES)),
    ) {
        (Some(h), Some(a)) => (Some(h), Some(a)),
        _ => (None, None),
    };

    Ok(NormalizedGame {
        start,
        home_team,
        away_team,
        rink: get_field(raw, RINK_ALIASES).unwrap_or_default(),
        home_score,
        away_score,
    })
}

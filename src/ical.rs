use std::collections::HashMap;
use std::fs;
use std::path::Path;

use icalendar::{Calendar, CalendarDateTime, Component, Event, EventLike, Property};
use tracing::info;

use crate::config::Config;
use crate::model::game::NormalizedGame;

/// Time zone identifier stamped on every DTSTART/DTEND. Times are published
/// as Eastern wall-clock values and are never converted to UTC.
pub const EASTERN_TZID: &str = "America/Toronto";

/// Derive the stable event identifier for a game.
///
/// Only the calendar date and the two team names participate, so a re-run
/// that adds a score or corrects a rink updates the same entry in consuming
/// calendar applications instead of duplicating it.
pub fn event_uid(game: &NormalizedGame) -> String {
    format!(
        "{}-{}-{}@truenorthhockey.com",
        game.start.format("%Y%m%d"),
        game.home_team,
        game.away_team
    )
    .replace(' ', "_")
}

fn event_title(game: &NormalizedGame) -> String {
    let home = if game.home_team.is_empty() { "Home" } else { &game.home_team };
    let away = if game.away_team.is_empty() { "Away" } else { &game.away_team };
    let mut title = format!("{} vs {}", home, away);
    if !game.rink.is_empty() {
        title.push_str(" | ");
        title.push_str(&game.rink);
    }
    title
}

fn event_description(game: &NormalizedGame) -> String {
    let home = if game.home_team.is_empty() { "TBD" } else { &game.home_team };
    let away = if game.away_team.is_empty() { "TBD" } else { &game.away_team };
    let mut lines = vec![format!("Home: {}", home), format!("Away: {}", away)];
    if let (Some(hs), Some(aws)) = (game.home_score, game.away_score) {
        lines.push(format!("Final: {} {} - {} {}", home, hs, aws, away));
    }
    if !game.rink.is_empty() {
        lines.push(format!("Rink: {}", game.rink));
    }
    lines.join("\n")
}

fn build_event(game: &NormalizedGame, duration_hours: f64) -> Event {
    let start = game.start.naive_local();
    let end = start + chrono::Duration::minutes((duration_hours * 60.0).round() as i64);

    let mut event = Event::new();
    event
        .summary(&event_title(game))
        .starts(CalendarDateTime::WithTimezone {
            date_time: start,
            tzid: EASTERN_TZID.to_string(),
        })
        .ends(CalendarDateTime::WithTimezone {
            date_time: end,
            tzid: EASTERN_TZID.to_string(),
        })
        .location(if game.rink.is_empty() { "TBD" } else { &game.rink })
        .description(&event_description(game))
        .uid(&event_uid(game));
    event.done()
}

/// Build the full VCALENDAR from normalized games.
///
/// Games sharing a UID collapse last-capture-wins, and events are emitted in
/// chronological order. Zero games still yields a valid empty calendar.
pub fn build_calendar(games: &[NormalizedGame], config: &Config) -> Calendar {
    let mut deduped: Vec<&NormalizedGame> = Vec::new();
    let mut index_by_uid: HashMap<String, usize> = HashMap::new();
    for game in games {
        let uid = event_uid(game);
        match index_by_uid.get(&uid) {
            Some(&i) => deduped[i] = game,
            None => {
                index_by_uid.insert(uid, deduped.len());
                deduped.push(game);
            }
        }
    }
    deduped.sort_by_key(|g| g.start);

    let mut calendar = Calendar::new();
    calendar
        .name(&format!("{} Hockey Schedule", config.team_name))
        .timezone(EASTERN_TZID)
        .append_property(Property::new("METHOD", "PUBLISH"))
        .append_property(Property::new(
            "X-WR-CALDESC",
            &format!("Game schedule for the {} - True North Hockey.", config.team_name),
        ));
    for game in deduped {
        calendar.push(build_event(game, config.game_duration_hours));
    }
    calendar
}

/// Serialize the calendar and move it into place.
///
/// The document is written to a sibling temp file first and renamed over the
/// output path, so a crash mid-write never leaves a partial file behind.
pub fn write_calendar(path: &Path, calendar: &Calendar) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create {}: {}", parent.display(), e))?;
        }
    }

    let body = calendar.to_string();
    let tmp = path.with_extension("ics.tmp");
    fs::write(&tmp, &body).map_err(|e| format!("failed to write {}: {}", tmp.display(), e))?;
    fs::rename(&tmp, path)
        .map_err(|e| format!("failed to move {} into place: {}", path.display(), e))?;

    info!(path = %path.display(), bytes = body.len(), "Wrote calendar");
    Ok(())
}

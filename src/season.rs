use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::{info, warn};

/// First month of the fall half of a season. September through December
/// resolve to the fall year, January through August to the spring year.
const FALL_START_MONTH: u32 = 9;

/// The two calendar years a season spans, read once from the page text and
/// consumed by every date resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeasonYears {
    pub fall_year: i32,
    pub spring_year: i32,
}

impl SeasonYears {
    /// Extract the season from page text containing a label like "Winter 25/26".
    ///
    /// The label must stand alone (word-bounded), so digits embedded in longer
    /// runs never match. When no label is found, fall back to a heuristic on
    /// `today`; the fallback is logged, never silent. `today` is a parameter to
    /// keep the policy testable.
    pub fn from_page_text(text: &str, today: NaiveDate) -> Self {
        let label = Regex::new(r"\b(\d{2})/(\d{2})\b").expect("season label regex");
        if let Some(caps) = label.captures(text) {
            let fall_year = 2000 + caps[1].parse::<i32>().expect("two digits");
            let mut spring_year = 2000 + caps[2].parse::<i32>().expect("two digits");
            if spring_year != fall_year + 1 {
                warn!(
                    label = &caps[0],
                    "Season label does not span consecutive years; using fall year + 1"
                );
                spring_year = fall_year + 1;
            }
            info!(label = &caps[0], fall_year, spring_year, "Detected season");
            return SeasonYears { fall_year, spring_year };
        }

        let season = if today.month() >= FALL_START_MONTH {
            SeasonYears { fall_year: today.year(), spring_year: today.year() + 1 }
        } else {
            SeasonYears { fall_year: today.year() - 1, spring_year: today.year() }
        };
        warn!(
            fall_year = season.fall_year,
            spring_year = season.spring_year,
            "Season label not found in page text; falling back to current date"
        );
        season
    }

    /// Resolve the calendar year for a game month.
    pub fn year_for_month(&self, month: u32) -> i32 {
        if month >= FALL_START_MONTH {
            self.fall_year
        } else {
            self.spring_year
        }
    }
}

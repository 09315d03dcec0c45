use chrono::NaiveDate;

use hockey_schedule_ics::season::SeasonYears;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn detects_season_label_in_page_text() {
    let text = "True North Hockey Canada\nBeavers\nWinter 25/26\nSchedule";
    let season = SeasonYears::from_page_text(text, day(2020, 1, 1));
    assert_eq!(season.fall_year, 2025);
    assert_eq!(season.spring_year, 2026);
}

#[test]
fn first_label_wins_when_text_has_several() {
    let text = "Winter 24/25 archive\nWinter 25/26";
    let season = SeasonYears::from_page_text(text, day(2020, 1, 1));
    assert_eq!(season.fall_year, 2024);
}

#[test]
fn digits_embedded_in_longer_runs_do_not_match() {
    // "125/264" must not be read as a 25/26 label; the date fallback applies.
    let season = SeasonYears::from_page_text("invoice 125/264", day(2025, 10, 1));
    assert_eq!(season, SeasonYears { fall_year: 2025, spring_year: 2026 });
}

#[test]
fn fallback_in_fall_uses_current_year_as_fall_year() {
    let season = SeasonYears::from_page_text("no label here", day(2025, 9, 14));
    assert_eq!(season, SeasonYears { fall_year: 2025, spring_year: 2026 });
}

#[test]
fn fallback_in_spring_uses_prior_year_as_fall_year() {
    let season = SeasonYears::from_page_text("no label here", day(2026, 3, 2));
    assert_eq!(season, SeasonYears { fall_year: 2025, spring_year: 2026 });
}

#[test]
fn non_consecutive_label_is_corrected() {
    let season = SeasonYears::from_page_text("Winter 25/27", day(2020, 1, 1));
    assert_eq!(season, SeasonYears { fall_year: 2025, spring_year: 2026 });
}

#[test]
fn maps_months_to_season_halves() {
    let season = SeasonYears { fall_year: 2025, spring_year: 2026 };
    assert_eq!(season.year_for_month(9), 2025);
    assert_eq!(season.year_for_month(12), 2025);
    assert_eq!(season.year_for_month(1), 2026);
    assert_eq!(season.year_for_month(8), 2026);
}

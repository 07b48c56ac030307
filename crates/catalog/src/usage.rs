//! "Tiempo de uso": turn a first-use date into an elapsed-duration label.

use chrono::{Datelike, Days, Local, NaiveDate};

use crate::locale::{Locale, pluralize};

/// `true` iff the trimmed text is shaped exactly like `YYYY-MM-DD`.
///
/// Pattern-only: `2023-02-30` is accepted. Calendar validity is not checked.
pub fn is_strict_calendar_date(text: &str) -> bool {
    date_components(text).is_some()
}

/// Elapsed label in the default locale (`es-AR`).
pub fn format_elapsed(date_text: &str, today: NaiveDate) -> String {
    format_elapsed_in(date_text, today, Locale::EsAr)
}

/// Elapsed label between a first-use date and `today`.
///
/// - blank input gives an empty label;
/// - text not shaped like `YYYY-MM-DD` is legacy free text and passes through
///   (trimmed), and so do dates with a month or day out of range;
/// - otherwise whole months are counted, a month only completing once its
///   day-of-month is reached: `"5 meses"`, `"1 año y 6 meses"`, or
///   `"Menos de 1 mes"` when under one month (or in the future).
pub fn format_elapsed_in(date_text: &str, today: NaiveDate, locale: Locale) -> String {
    let raw = date_text.trim();
    if raw.is_empty() {
        return String::new();
    }

    let Some(first_use) = date_components(raw).and_then(|(y, m, d)| rolled_over_date(y, m, d)) else {
        return raw.to_string();
    };

    let months = elapsed_months(first_use, today);
    let words = locale.words();
    if months <= 0 {
        return words.under_one_month.to_string();
    }

    let months = months.unsigned_abs();
    let years = months / 12;
    let rest = months % 12;

    let mut parts = Vec::with_capacity(2);
    if years > 0 {
        parts.push(pluralize(years, words.year, words.years));
    }
    if rest > 0 {
        parts.push(pluralize(rest, words.month, words.months));
    }
    parts.join(&format!(" {} ", words.conjunction))
}

/// Same as [`format_elapsed_in`] against the local calendar date.
pub fn format_elapsed_now(date_text: &str, locale: Locale) -> String {
    format_elapsed_in(date_text, Local::now().date_naive(), locale)
}

/// Value to pre-fill the admin date input with: only strict dates survive,
/// legacy free text leaves the input empty.
pub fn first_use_for_form(text: &str) -> String {
    let raw = text.trim();
    if is_strict_calendar_date(raw) {
        raw.to_string()
    } else {
        String::new()
    }
}

/// Date for pattern-valid components, rolling overflowing days into the next
/// month (`2023-02-30` is March 2nd). Months outside 1..=12 and days outside
/// 1..=31 have no date.
fn rolled_over_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day - 1)))
}

/// Whole months from `first_use` to `today`; a month completes once its
/// day-of-month is reached.
fn elapsed_months(first_use: NaiveDate, today: NaiveDate) -> i64 {
    let mut months = i64::from(today.year() - first_use.year()) * 12 + i64::from(today.month())
        - i64::from(first_use.month());
    if today.day() < first_use.day() {
        months -= 1;
    }
    months
}

fn date_components(text: &str) -> Option<(i32, u32, u32)> {
    let raw = text.trim();
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }

    let year = raw[0..4].parse().ok()?;
    let month = raw[5..7].parse().ok()?;
    let day = raw[8..10].parse().ok()?;
    Some((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_of_month_completes_the_month() {
        assert_eq!(format_elapsed("2023-01-15", date(2023, 6, 15)), "5 meses");
    }

    #[test]
    fn day_not_reached_yet_drops_a_month() {
        assert_eq!(format_elapsed("2023-01-20", date(2023, 6, 15)), "4 meses");
    }

    #[test]
    fn years_and_months_are_joined() {
        assert_eq!(format_elapsed("2022-01-15", date(2023, 7, 15)), "1 año y 6 meses");
    }

    #[test]
    fn exact_years_omit_months() {
        assert_eq!(format_elapsed("2021-03-01", date(2023, 3, 1)), "2 años");
    }

    #[test]
    fn singular_units() {
        assert_eq!(format_elapsed("2022-02-10", date(2023, 3, 10)), "1 año y 1 mes");
        assert_eq!(format_elapsed("2023-02-10", date(2023, 3, 10)), "1 mes");
    }

    #[test]
    fn under_a_month_or_future() {
        assert_eq!(format_elapsed("2023-06-01", date(2023, 6, 20)), "Menos de 1 mes");
        assert_eq!(format_elapsed("2023-05-25", date(2023, 6, 20)), "Menos de 1 mes");
        assert_eq!(format_elapsed("2024-01-01", date(2023, 6, 20)), "Menos de 1 mes");
    }

    #[test]
    fn free_text_passes_through() {
        assert_eq!(format_elapsed("not-a-date", date(2023, 6, 15)), "not-a-date");
        assert_eq!(format_elapsed("  2 años aprox ", date(2023, 6, 15)), "2 años aprox");
        assert_eq!(format_elapsed("2023-6-15", date(2023, 6, 15)), "2023-6-15");
        assert_eq!(format_elapsed("2023-06-15T10:00", date(2023, 6, 15)), "2023-06-15T10:00");
    }

    #[test]
    fn blank_input_gives_empty_label() {
        assert_eq!(format_elapsed("", date(2023, 6, 15)), "");
        assert_eq!(format_elapsed("   ", date(2023, 6, 15)), "");
    }

    #[test]
    fn english_labels() {
        assert_eq!(
            format_elapsed_in("2022-01-15", date(2023, 7, 15), Locale::En),
            "1 year and 6 months"
        );
        assert_eq!(
            format_elapsed_in("2023-06-01", date(2023, 6, 2), Locale::En),
            "Less than 1 month"
        );
    }

    #[test]
    fn strict_pattern_only() {
        assert!(is_strict_calendar_date("2023-01-15"));
        assert!(is_strict_calendar_date(" 2023-01-15 "));
        assert!(!is_strict_calendar_date("2023-01"));
        assert!(!is_strict_calendar_date("2023-01-15 10:00"));
        assert!(!is_strict_calendar_date("2023/01/15"));
        assert!(!is_strict_calendar_date("２０２３-01-15"));
    }

    #[test]
    fn overflowing_days_roll_into_the_next_month() {
        assert!(is_strict_calendar_date("2023-02-30"));
        // 2023-02-30 counts from 2023-03-02.
        assert_eq!(format_elapsed("2023-02-30", date(2023, 6, 15)), "3 meses");
        assert_eq!(format_elapsed("2023-02-30", date(2023, 6, 30)), "3 meses");
        assert_eq!(format_elapsed("2023-02-30", date(2023, 6, 1)), "2 meses");
        assert_eq!(format_elapsed("2023-04-31", date(2023, 6, 1)), "1 mes");
    }

    #[test]
    fn out_of_range_components_pass_through() {
        let today = date(2024, 6, 15);
        for raw in ["2023-13-10", "2023-00-10", "2023-06-32", "2023-06-00"] {
            assert_eq!(format_elapsed(raw, today), raw);
        }
        assert_eq!(format_elapsed(" 2023-13-10 ", today), "2023-13-10");
        assert!(is_strict_calendar_date("2023-13-10"));
    }

    #[test]
    fn form_prefill_drops_legacy_text() {
        assert_eq!(first_use_for_form("2023-01-15"), "2023-01-15");
        assert_eq!(first_use_for_form("como nuevo"), "");
    }
}

//! Publication date inference for listing entries.
//!
//! Listing pages show dates in several hand-written shapes, often without a
//! year and sometimes not at all. [`DateResolver`] tries a fixed chain of
//! strategies and stops at the first one that produces a timestamp:
//!
//! 1. **Structural**: regex shapes searched inside the text
//!    (`MM/DD HH:MM`, `MM/DD`, `YYYY/MM/DD HH:MM`, `YYYY/MM/DD`)
//! 2. **Template**: strict whole-string parses, including hyphenated
//!    `YYYY-MM-DD[ HH:MM]`
//! 3. **URL**: the `YYYYMMDD` prefix of a `/news/n<date><seq>` article id
//!
//! Dates without a year get the resolver's current year. The current year is
//! passed in rather than read from the clock so resolution is reproducible.
//! Timestamps are local time. A wall-clock time skipped by a DST jump is
//! moved forward an hour; an ambiguous one takes the earlier instant.

use chrono::format::{Parsed, StrftimeItems, parse};
use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

/// Which strategy produced a resolved date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    Structural,
    Template,
    Url,
}

impl fmt::Display for DateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateStrategy::Structural => "structural",
            DateStrategy::Template => "template",
            DateStrategy::Url => "url",
        };
        f.write_str(name)
    }
}

/// Digit groupings recognised by the structural matchers, in priority order.
#[derive(Debug, Clone, Copy)]
enum Shape {
    MonthDayTime,
    MonthDay,
    YearMonthDayTime,
    YearMonthDay,
}

// Matches may sit inside other text but must not start right after a digit or
// slash, otherwise `MM/DD` would claim the tail of `YYYY/MM/DD`. A trailing
// `/` is allowed after `MM/DD`, so US-style `MM/DD/YYYY` still yields `MM/DD`.
static STRUCTURAL: Lazy<Vec<(Shape, Regex)>> = Lazy::new(|| {
    vec![
        (
            Shape::MonthDayTime,
            Regex::new(r"(?:^|[^0-9/])([0-9]{1,2})/([0-9]{1,2})\s+([0-9]{1,2}):([0-9]{2})(?:[^0-9]|$)").unwrap(),
        ),
        (
            Shape::MonthDay,
            Regex::new(r"(?:^|[^0-9/])([0-9]{1,2})/([0-9]{1,2})(?:[^0-9]|$)").unwrap(),
        ),
        (
            Shape::YearMonthDayTime,
            Regex::new(r"(?:^|[^0-9/])([0-9]{4})/([0-9]{1,2})/([0-9]{1,2})\s+([0-9]{1,2}):([0-9]{2})(?:[^0-9]|$)").unwrap(),
        ),
        (
            Shape::YearMonthDay,
            Regex::new(r"(?:^|[^0-9/])([0-9]{4})/([0-9]{1,2})/([0-9]{1,2})(?:[^0-9/]|$)").unwrap(),
        ),
    ]
});

/// Strict templates: (format, carries a year, carries a time).
const TEMPLATES: [(&str, bool, bool); 6] = [
    ("%m/%d %H:%M", false, true),
    ("%m/%d", false, false),
    ("%Y/%m/%d %H:%M", true, true),
    ("%Y/%m/%d", true, false),
    ("%Y-%m-%d %H:%M", true, true),
    ("%Y-%m-%d", true, false),
];

/// Article ids look like `/news/n202510010929`: eight date digits followed by
/// a sequence number.
static URL_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/news/n([0-9]{8})[0-9]+").unwrap());

/// Calendar fields captured by a structural match, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

impl Shape {
    fn fields(self, caps: &Captures<'_>, current_year: i32) -> Option<Fields> {
        let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let fields = match self {
            Shape::MonthDayTime => Fields {
                year: current_year,
                month: num(1)?,
                day: num(2)?,
                hour: num(3)?,
                minute: num(4)?,
            },
            Shape::MonthDay => Fields {
                year: current_year,
                month: num(1)?,
                day: num(2)?,
                hour: 0,
                minute: 0,
            },
            Shape::YearMonthDayTime => Fields {
                year: num(1)? as i32,
                month: num(2)?,
                day: num(3)?,
                hour: num(4)?,
                minute: num(5)?,
            },
            Shape::YearMonthDay => Fields {
                year: num(1)? as i32,
                month: num(2)?,
                day: num(3)?,
                hour: 0,
                minute: 0,
            },
        };
        Some(fields)
    }
}

/// Build a timestamp in `tz`, rolling out-of-range fields over the calendar
/// (month 13 is January of the next year, day 0 is the last day of the
/// previous month, hour 24 is midnight of the next day).
fn rollover_in<Tz: TimeZone>(tz: &Tz, fields: Fields) -> Option<DateTime<Tz>> {
    let january = NaiveDate::from_ymd_opt(fields.year, 1, 1)?;
    let month_offset = i64::from(fields.month) - 1;
    let first_of_month = if month_offset >= 0 {
        january.checked_add_months(Months::new(month_offset as u32))?
    } else {
        january.checked_sub_months(Months::new(month_offset.unsigned_abs() as u32))?
    };
    let naive = first_of_month
        .and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::days(i64::from(fields.day) - 1))?
        .checked_add_signed(Duration::hours(i64::from(fields.hour)))?
        .checked_add_signed(Duration::minutes(i64::from(fields.minute)))?;
    map_local(tz, naive)
}

/// Attach `tz` to a wall-clock time.
///
/// Ambiguous times take the earlier instant. Times skipped by a DST jump are
/// pushed forward past the gap, so 02:30 on a spring-forward night is 03:30.
fn map_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(date) => Some(date),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}

/// Resolves free-form date text into a canonical local timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResolver {
    current_year: i32,
}

impl DateResolver {
    /// Create a resolver that fills missing years with `current_year`.
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Create a resolver whose current year is taken from `reference`.
    pub fn from_reference(reference: DateTime<Local>) -> Self {
        Self::new(reference.year())
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Resolve `text`, falling back to a date embedded in `url_hint`.
    ///
    /// Returns `None` when no strategy matches. Never fails otherwise.
    pub fn resolve(&self, text: &str, url_hint: &str) -> Option<DateTime<Local>> {
        self.resolve_with_strategy(text, url_hint).map(|(date, _)| date)
    }

    /// Like [`DateResolver::resolve`], also reporting which strategy matched.
    pub fn resolve_with_strategy(
        &self,
        text: &str,
        url_hint: &str,
    ) -> Option<(DateTime<Local>, DateStrategy)> {
        self.resolve_in(&Local, text, url_hint)
    }

    /// Run the strategy chain with wall-clock times read in `tz`.
    pub fn resolve_in<Tz: TimeZone>(
        &self,
        tz: &Tz,
        text: &str,
        url_hint: &str,
    ) -> Option<(DateTime<Tz>, DateStrategy)> {
        let text = text.trim();
        if !text.is_empty() {
            // The first shape that matches decides, even if its fields are nonsense.
            if let Some(matched) = self.structural(tz, text) {
                return matched.map(|date| (date, DateStrategy::Structural));
            }
            if let Some(date) = self.template(tz, text) {
                return Some((date, DateStrategy::Template));
            }
        }
        date_from_url(tz, url_hint).map(|date| (date, DateStrategy::Url))
    }

    /// `None` when no shape matches; `Some(None)` when a shape matched but its
    /// fields could not be placed on the calendar at all.
    fn structural<Tz: TimeZone>(&self, tz: &Tz, text: &str) -> Option<Option<DateTime<Tz>>> {
        let (shape, caps) = STRUCTURAL
            .iter()
            .find_map(|(shape, re)| re.captures(text).map(|caps| (*shape, caps)))?;
        Some(
            shape
                .fields(&caps, self.current_year)
                .and_then(|fields| rollover_in(tz, fields)),
        )
    }

    fn template<Tz: TimeZone>(&self, tz: &Tz, text: &str) -> Option<DateTime<Tz>> {
        TEMPLATES.iter().find_map(|&(format, has_year, has_time)| {
            self.parse_template(tz, text, format, has_year, has_time)
        })
    }

    fn parse_template<Tz: TimeZone>(
        &self,
        tz: &Tz,
        text: &str,
        format: &str,
        has_year: bool,
        has_time: bool,
    ) -> Option<DateTime<Tz>> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(format)).ok()?;
        if !has_year {
            parsed.set_year(i64::from(self.current_year)).ok()?;
        }
        let date = parsed.to_naive_date().ok()?;
        let time = if has_time {
            parsed.to_naive_time().ok()?
        } else {
            NaiveTime::MIN
        };
        map_local(tz, date.and_time(time))
    }
}

/// Extract the publication day from a `/news/n<YYYYMMDD><seq>` URL, as
/// midnight in `tz`.
pub fn date_from_url<Tz: TimeZone>(tz: &Tz, url: &str) -> Option<DateTime<Tz>> {
    let caps = URL_DATE.captures(url)?;
    let digits = caps.get(1)?.as_str();
    let fields = Fields {
        year: digits[..4].parse().ok()?,
        month: digits[4..6].parse().ok()?,
        day: digits[6..8].parse().ok()?,
        hour: 0,
        minute: 0,
    };
    rollover_in(tz, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn resolver() -> DateResolver {
        DateResolver::new(2025)
    }

    #[test]
    fn test_month_day_uses_current_year() {
        assert_eq!(resolver().resolve("10/01", ""), Some(local(2025, 10, 1, 0, 0)));
    }

    #[test]
    fn test_month_day_time() {
        assert_eq!(
            resolver().resolve("  10/01 09:29 ", ""),
            Some(local(2025, 10, 1, 9, 29))
        );
    }

    #[test]
    fn test_explicit_year_with_time_keeps_all_fields() {
        for y in [2020, 2024, 2025] {
            for m in 1..=12u32 {
                let next_month = NaiveDate::from_ymd_opt(y, m, 1).unwrap() + Months::new(1);
                let days = next_month.pred_opt().unwrap().day();
                for d in 1..=days {
                    for h in [0, 9, 23] {
                        for min in [0, 5, 59] {
                            let text = format!("{:04}/{:02}/{:02} {:02}:{:02}", y, m, d, h, min);
                            let (resolved, strategy) = resolver().resolve_in(&Utc, &text, "").unwrap();
                            assert_eq!(strategy, DateStrategy::Structural, "{text}");
                            assert_eq!(
                                (resolved.year(), resolved.month(), resolved.day(), resolved.hour(), resolved.minute()),
                                (y, m, d, h, min),
                                "{text}"
                            );
                            assert_eq!(resolved.second(), 0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_explicit_year_without_padding() {
        assert_eq!(
            resolver().resolve_with_strategy("2025/1/5 9:05", ""),
            Some((local(2025, 1, 5, 9, 5), DateStrategy::Structural))
        );
    }

    #[test]
    fn test_month_day_followed_by_slash_and_year() {
        assert_eq!(
            resolver().resolve_with_strategy("10/01/2025", ""),
            Some((local(2025, 10, 1, 0, 0), DateStrategy::Structural))
        );
        // The trailing year is not read; the resolver's year is used.
        assert_eq!(
            DateResolver::new(2024).resolve("10/01/2025", ""),
            Some(local(2024, 10, 1, 0, 0))
        );
    }

    #[test]
    fn test_spring_forward_gap_moves_forward_and_stays_structural() {
        let tz = chrono_tz::America::New_York;
        let resolved = resolver().resolve_in(&tz, "03/09 02:30", "https://site/news/n2025010100001");
        assert_eq!(
            resolved,
            Some((tz.with_ymd_and_hms(2025, 3, 9, 3, 30, 0).unwrap(), DateStrategy::Structural))
        );
    }

    #[test]
    fn test_fall_back_overlap_takes_earlier_instant() {
        let tz = chrono_tz::America::New_York;
        let (resolved, strategy) = resolver().resolve_in(&tz, "2025/11/02 01:30", "").unwrap();
        assert_eq!(strategy, DateStrategy::Structural);
        assert_eq!(resolved, tz.with_ymd_and_hms(2025, 11, 2, 1, 30, 0).earliest().unwrap());
        let utc = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap().and_hms_opt(5, 30, 0).unwrap();
        assert_eq!(resolved.naive_utc(), utc);
    }

    #[test]
    fn test_template_in_gap_moves_forward() {
        let tz = chrono_tz::America::New_York;
        assert_eq!(
            resolver().resolve_in(&tz, "2025-03-09 02:15", ""),
            Some((tz.with_ymd_and_hms(2025, 3, 9, 3, 15, 0).unwrap(), DateStrategy::Template))
        );
    }

    #[test]
    fn test_explicit_year_is_not_shadowed_by_month_day() {
        assert_eq!(
            resolver().resolve("2023/04/05", ""),
            Some(local(2023, 4, 5, 0, 0))
        );
    }

    #[test]
    fn test_structural_match_tolerates_surrounding_text() {
        assert_eq!(
            resolver().resolve("更新 10/02 15:00 決算", ""),
            Some(local(2025, 10, 2, 15, 0))
        );
    }

    #[test]
    fn test_hyphenated_dates_use_templates() {
        let r = resolver();
        assert_eq!(
            r.resolve_with_strategy("2024-03-09 14:45", ""),
            Some((local(2024, 3, 9, 14, 45), DateStrategy::Template))
        );
        assert_eq!(r.resolve("2024-03-09", ""), Some(local(2024, 3, 9, 0, 0)));
    }

    #[test]
    fn test_invalid_template_date_is_rejected() {
        assert_eq!(resolver().resolve("2024-02-30", "https://site/other"), None);
    }

    #[test]
    fn test_out_of_range_structural_fields_roll_over() {
        let r = resolver();
        assert_eq!(r.resolve("13/01", ""), Some(local(2026, 1, 1, 0, 0)));
        assert_eq!(r.resolve("09/31", ""), Some(local(2025, 10, 1, 0, 0)));
        assert_eq!(r.resolve("10/01 24:00", ""), Some(local(2025, 10, 2, 0, 0)));
    }

    #[test]
    fn test_structural_match_wins_over_url() {
        assert_eq!(
            resolver().resolve_with_strategy("10/03", "https://site/news/n2025100109290"),
            Some((local(2025, 10, 3, 0, 0), DateStrategy::Structural))
        );
    }

    #[test]
    fn test_url_fallback_for_empty_text() {
        assert_eq!(
            resolver().resolve_with_strategy("", "https://site/news/n2025100109290"),
            Some((local(2025, 10, 1, 0, 0), DateStrategy::Url))
        );
    }

    #[test]
    fn test_url_fallback_after_unparseable_text() {
        assert_eq!(
            resolver().resolve("昨日", "https://us.kabutan.jp/news/n2025093012345"),
            Some(local(2025, 9, 30, 0, 0))
        );
    }

    #[test]
    fn test_url_without_sequence_digits_is_ignored() {
        assert_eq!(date_from_url(&Local, "https://site/news/n20251001"), None);
    }

    #[test]
    fn test_garbage_is_unresolved() {
        assert_eq!(resolver().resolve("garbage text", "https://site/other/page"), None);
    }

    #[test]
    fn test_from_reference_takes_year() {
        let reference = local(2031, 6, 1, 12, 0);
        let r = DateResolver::from_reference(reference);
        assert_eq!(r.current_year(), 2031);
        assert_eq!(r.resolve("06/01", ""), Some(local(2031, 6, 1, 0, 0)));
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(DateStrategy::Structural.to_string(), "structural");
        assert_eq!(DateStrategy::Url.to_string(), "url");
    }
}

//! Calendar export: weekly-recurring events from a canonical schedule.
//!
//! Pure transform. Output order follows the schedule's canonical cell order,
//! so the same schedule and catalog always give the same event list.
//! Serialization (ICS, CSV) happens in the caller.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::day::SchoolDay;
use crate::period::PeriodCatalog;
use crate::schedule::{CanonicalSchedule, ClassRef, ScheduleCell};
use crate::time::{WallClock, resolve_local};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
    pub timezone: Tz,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExportFilter {
    #[default]
    All,
    Class(ClassRef),
    Teacher(String),
}

impl ExportFilter {
    fn accepts(&self, cell: &ScheduleCell<'_>) -> bool {
        match self {
            ExportFilter::All => true,
            ExportFilter::Class(c) => c.grade_level == cell.grade_level && c.stream == cell.stream,
            ExportFilter::Teacher(id) => {
                cell.entry.as_lesson().is_some_and(|(_, t)| t == id.as_str())
            }
        }
    }
}

/// A lesson repeating every week on `day` in `timezone`.
///
/// The recurrence is anchored on local wall-clock time, so occurrences keep
/// the configured times across DST changes. The UTC instants of the first
/// occurrence are kept for display and checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringEvent {
    /// Stable across exports of the same cell.
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub day: SchoolDay,
    /// Wall-clock times exactly as configured.
    pub start: WallClock,
    pub end: WallClock,
    pub timezone: Tz,
    /// First occurrence in local time.
    pub first_start: NaiveDateTime,
    pub first_end: NaiveDateTime,
    pub first_start_utc: DateTime<Utc>,
    pub first_end_utc: DateTime<Utc>,
    /// Term end, 23:59:59 local.
    pub until_utc: DateTime<Utc>,
}

/// One weekly event per lesson cell that passes `filter`.
///
/// Cells without a matching catalog slot, and times that can't be resolved in
/// the timezone, are skipped with a warning.
pub fn export_events(
    schedule: &CanonicalSchedule,
    catalog: &PeriodCatalog,
    options: &ExportOptions,
    filter: &ExportFilter,
) -> Vec<RecurringEvent> {
    let Some(until_utc) = term_end_utc(options) else {
        log::warn!("could not resolve term end {} in {}", options.term_end, options.timezone);
        return Vec::new();
    };

    let mut out = Vec::new();
    for cell in schedule.cells() {
        let Some((subject, teacher_id)) = cell.entry.as_lesson() else {
            continue;
        };
        if !filter.accepts(&cell) {
            continue;
        }
        let Some(slot) = catalog.get(cell.index) else {
            log::warn!(
                "{} {} period {} has no catalog slot; not exported",
                cell.stream,
                cell.day,
                cell.index
            );
            continue;
        };

        let date = first_on_or_after(options.term_start, cell.day);
        if date > options.term_end {
            continue;
        }

        let (start_utc, end_utc) = match (
            resolve_local(date, &slot.start, options.timezone),
            resolve_local(date, &slot.end, options.timezone),
        ) {
            (Ok(s), Ok(e)) => (s, e),
            (Err(err), _) | (_, Err(err)) => {
                log::warn!("skipping {} {} period {}: {err}", cell.stream, cell.day, cell.index);
                continue;
            }
        };

        out.push(RecurringEvent {
            uid: event_uid(&cell),
            summary: format!("{subject} ({})", cell.stream),
            description: format!("Teacher: {teacher_id}\nGrade: {}", cell.grade_level),
            location: cell.stream.to_string(),
            day: cell.day,
            start: slot.start.clone(),
            end: slot.end.clone(),
            timezone: options.timezone,
            first_start: start_utc.with_timezone(&options.timezone).naive_local(),
            first_end: end_utc.with_timezone(&options.timezone).naive_local(),
            first_start_utc: start_utc,
            first_end_utc: end_utc,
            until_utc,
        });
    }
    out
}

fn first_on_or_after(date: NaiveDate, day: SchoolDay) -> NaiveDate {
    let from = date.weekday().num_days_from_monday() as i64;
    let to = day.weekday().num_days_from_monday() as i64;
    date + Duration::days((to - from).rem_euclid(7))
}

fn term_end_utc(options: &ExportOptions) -> Option<DateTime<Utc>> {
    let end = options.term_end.and_time(NaiveTime::from_hms_opt(23, 59, 59)?);
    options
        .timezone
        .from_local_datetime(&end)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn event_uid(cell: &ScheduleCell<'_>) -> String {
    let slug = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect()
    };
    format!(
        "{}-{}-{}-{}@timetable",
        slug(cell.grade_level),
        slug(cell.stream),
        cell.day.ics_code().to_lowercase(),
        cell.index
    )
}

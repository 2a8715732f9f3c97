//! The single decode boundary from wire period entries to [`PeriodEntry`].
//!
//! Rules:
//! - `"Break"` (any case) is `Break`; `"Free"`, `"-"` and `""` are gaps; any
//!   other string is an activity of that type.
//! - `[subject, teacher]` is a lesson.
//! - An object whose `type` is not `"lesson"` is `Other{type, name}`; a lesson
//!   object needs both `subject` and `teacher`.
//!
//! A malformed entry never fails the whole payload: it becomes a gap and is
//! logged.

use timetable_core::{DaySchedule, PeriodEntry, SchoolDay, StreamWeek};

use crate::error::{IngestError, Result};
use crate::types::{RawPeriodEntry, RawPeriodObject, RawWeek};

/// `Ok(None)` is an explicit free slot.
pub fn decode_entry(raw: &RawPeriodEntry) -> Result<Option<PeriodEntry>> {
    match raw {
        RawPeriodEntry::Sentinel(s) => Ok(decode_sentinel(s)),
        RawPeriodEntry::Pair(subject, teacher) => Ok(Some(PeriodEntry::lesson(subject, teacher))),
        RawPeriodEntry::Object(obj) => decode_object(obj).map(Some),
        RawPeriodEntry::Unrecognized(v) => Err(IngestError::MalformedEntry(v.to_string())),
    }
}

fn decode_sentinel(s: &str) -> Option<PeriodEntry> {
    let t = s.trim();
    match t.to_lowercase().as_str() {
        "break" => Some(PeriodEntry::Break),
        "" | "free" | "-" => None,
        _ => Some(PeriodEntry::other(t, None)),
    }
}

fn decode_object(obj: &RawPeriodObject) -> Result<PeriodEntry> {
    let kind = obj.kind.as_deref().map(str::trim).unwrap_or("");
    let is_lesson = kind.is_empty() || kind.eq_ignore_ascii_case("lesson");

    if !is_lesson {
        let name = obj.name.clone().filter(|n| !n.trim().is_empty());
        return Ok(PeriodEntry::other(kind, name));
    }

    match (non_empty(&obj.subject), non_empty(&obj.teacher)) {
        (Some(subject), Some(teacher)) => Ok(PeriodEntry::lesson(subject, teacher)),
        _ => Err(IngestError::MalformedEntry(format!(
            "lesson without subject/teacher (period_id {:?})",
            obj.period_id
        ))),
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_day_name(s: &str) -> Result<SchoolDay> {
    SchoolDay::parse(s).ok_or_else(|| IngestError::UnknownDay(s.to_string()))
}

/// Decode one day, keeping positions. `context` names the class for logs.
pub fn decode_day(raw: &[Option<RawPeriodEntry>], context: &str) -> DaySchedule {
    let slots = raw
        .iter()
        .enumerate()
        .map(|(i, r)| match r {
            None => None,
            Some(r) => match decode_entry(r) {
                Ok(e) => e,
                Err(err) => {
                    log::warn!("{context} period {i}: {err}; treated as free");
                    None
                }
            },
        })
        .collect();
    DaySchedule::new(slots)
}

/// Decode a day-keyed week. Unknown day names are skipped with a warning.
pub fn decode_week(raw: &RawWeek, context: &str) -> StreamWeek {
    let mut week = StreamWeek::new();
    for (day_name, entries) in raw {
        match parse_day_name(day_name) {
            Ok(day) => {
                week.insert(day, decode_day(entries, &format!("{context} {day}")));
            }
            Err(err) => log::warn!("{context}: {err}; skipped"),
        }
    }
    week
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: serde_json::Value) -> RawPeriodEntry {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_three_wire_shapes() {
        assert_eq!(decode_entry(&raw(json!("Break"))).unwrap(), Some(PeriodEntry::Break));
        assert_eq!(
            decode_entry(&raw(json!(["Mathematics", "T001"]))).unwrap(),
            Some(PeriodEntry::lesson("Mathematics", "T001"))
        );
        assert_eq!(
            decode_entry(&raw(json!({
                "period_id": 3, "start": "8:15", "end": "8:50",
                "type": "lesson", "subject": "Physics", "teacher": "T002"
            })))
            .unwrap(),
            Some(PeriodEntry::lesson("Physics", "T002"))
        );
        assert_eq!(
            decode_entry(&raw(json!({"type": "break", "name": "Lunch Break"}))).unwrap(),
            Some(PeriodEntry::other("break", Some("Lunch Break".to_string())))
        );
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(decode_entry(&raw(json!("BREAK"))).unwrap(), Some(PeriodEntry::Break));
        assert_eq!(decode_entry(&raw(json!("Free"))).unwrap(), None);
        assert_eq!(
            decode_entry(&raw(json!("registration"))).unwrap(),
            Some(PeriodEntry::other("registration", None))
        );
    }

    #[test]
    fn test_lesson_object_missing_teacher_is_malformed() {
        let err = decode_entry(&raw(json!({"type": "lesson", "subject": "Biology"}))).unwrap_err();
        assert!(matches!(err, IngestError::MalformedEntry(_)));
        assert!(decode_entry(&raw(json!(42))).is_err());
    }

    #[test]
    fn test_decode_day_keeps_positions() {
        let entries: Vec<Option<RawPeriodEntry>> =
            serde_json::from_value(json!(["registration", null, ["English", "T3"], 7, "Break"]))
                .unwrap();
        let day = decode_day(&entries, "Form 1A Monday");
        assert_eq!(day.len(), 5);
        assert!(day.get(1).is_none());
        assert_eq!(day.get(2), Some(&PeriodEntry::lesson("English", "T3")));
        assert!(day.get(3).is_none());
        assert_eq!(day.get(4), Some(&PeriodEntry::Break));
    }

    #[test]
    fn test_decode_week_skips_unknown_days() {
        let week: RawWeek = serde_json::from_value(json!({
            "Monday": ["Break"],
            "Saturday": ["Break"],
            "fri": [["Maths", "T1"]]
        }))
        .unwrap();
        let decoded = decode_week(&week, "Form 1A");
        let days: Vec<SchoolDay> = decoded.keys().copied().collect();
        assert_eq!(days, vec![SchoolDay::Monday, SchoolDay::Friday]);
    }
}

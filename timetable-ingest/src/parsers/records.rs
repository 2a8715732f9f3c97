//! `GET /timetable/` list responses: stored timetable records.

use timetable_core::CanonicalSchedule;

use crate::error::{IngestError, Result};
use crate::parsers::generate::add_record;
use crate::types::{Envelope, TimetableRecord};

pub fn parse_list_json(json: &str) -> Result<Vec<TimetableRecord>> {
    let env: Envelope<Vec<TimetableRecord>> = serde_json::from_str(json)?;
    if !env.success {
        return Err(IngestError::Unsuccessful(
            env.message.unwrap_or_else(|| "timetable list request failed".to_string()),
        ));
    }
    Ok(env.data.unwrap_or_default())
}

/// Merge records into one schedule. When two records hold the same class
/// the earlier record wins.
pub fn records_to_schedule(
    records: &[TimetableRecord],
    grade_order: &[String],
) -> CanonicalSchedule {
    let mut b = CanonicalSchedule::builder(grade_order);
    for record in records {
        if record.grade_level.trim().is_empty() {
            log::warn!("timetable record {:?} has no grade level; skipped", record.id);
            continue;
        }
        b = add_record(b, record, &record.grade_level);
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use timetable_core::{PeriodEntry, SchoolDay};

    fn list() -> serde_json::Value {
        json!({
            "success": true,
            "data": [
                {
                    "_id": "r1",
                    "academicYear": "2026",
                    "term": "1",
                    "gradeLevel": "Form 1",
                    "status": "active",
                    "streams": {
                        "Form 1A": {
                            "className": "Form 1A",
                            "schedule": {
                                "Monday": [
                                    {"period_id": 1, "start": "7:00", "end": "7:05", "type": "registration"},
                                    {"period_id": 2, "start": "7:05", "end": "7:40", "type": "lesson",
                                     "subject": "English", "teacher": "T002"}
                                ]
                            }
                        }
                    }
                },
                {
                    "_id": "r2",
                    "gradeLevel": "Form 1",
                    "streams": {
                        "Form 1A": {
                            "className": "Form 1A",
                            "schedule": { "Monday": ["Break", ["History", "T004"]] }
                        }
                    }
                }
            ]
        })
    }

    #[test]
    fn test_first_record_wins_for_duplicate_class() {
        let records = parse_list_json(&list().to_string()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_deref(), Some("r1"));

        let s = records_to_schedule(&records, &["Form 1".to_string()]);
        assert_eq!(
            s.entry("Form 1", "Form 1A", SchoolDay::Monday, 1),
            Some(&PeriodEntry::lesson("English", "T002"))
        );
        assert_eq!(
            s.entry("Form 1", "Form 1A", SchoolDay::Monday, 0),
            Some(&PeriodEntry::other("registration", None))
        );
    }

    #[test]
    fn test_missing_data_is_empty() {
        let records = parse_list_json(r#"{"success": true}"#).unwrap();
        assert!(records.is_empty());
        assert!(records_to_schedule(&records, &[]).is_empty());
    }

    #[test]
    fn test_failed_list() {
        let err = parse_list_json(r#"{"success": false, "message": "db down"}"#).unwrap_err();
        assert!(matches!(err, IngestError::Unsuccessful(m) if m == "db down"));
    }
}

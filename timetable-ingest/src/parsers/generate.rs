//! `POST /timetable/generate/{gradeLevel}` responses.
//!
//! Two shapes carry the same content:
//!   { "success": true, "data": { "<stream>": { "<day>": [..] } } }
//!   { "success": true, "timetable_data": { "streams": { "<key>": { "className", "schedule" } } } }
//! `data` may also be keyed by grade level first; then only the requested
//! grade level is taken. Both normalize to the same schedule fragment.

use timetable_core::{CanonicalSchedule, ScheduleBuilder};

use crate::decode::decode_week;
use crate::error::{IngestError, Result};
use crate::types::{GenerateData, GenerateResponse, TimetableRecord};

pub fn parse_generate_json(
    json: &str,
    grade_level: &str,
    grade_order: &[String],
) -> Result<CanonicalSchedule> {
    let resp: GenerateResponse = serde_json::from_str(json)?;
    generate_to_schedule(&resp, grade_level, grade_order)
}

pub fn generate_to_schedule(
    resp: &GenerateResponse,
    grade_level: &str,
    grade_order: &[String],
) -> Result<CanonicalSchedule> {
    if !resp.success {
        return Err(IngestError::Unsuccessful(
            resp.message
                .clone()
                .unwrap_or_else(|| format!("generation failed for {grade_level}")),
        ));
    }

    let builder = CanonicalSchedule::builder(grade_order);
    match (&resp.data, &resp.timetable_data) {
        (Some(data), _) => Ok(add_generate_data(builder, data, grade_level)?.build()),
        (None, Some(record)) => Ok(add_record(builder, record, grade_level).build()),
        (None, None) => Err(IngestError::Unsuccessful(format!(
            "generate response for {grade_level} carried no timetable"
        ))),
    }
}

fn add_generate_data(
    mut b: ScheduleBuilder,
    data: &GenerateData,
    grade_level: &str,
) -> Result<ScheduleBuilder> {
    match data {
        GenerateData::ByStream(streams) => {
            for (stream, week) in streams {
                // `{"<grade>": {}}` also parses as a stream map: an empty grade.
                if stream == grade_level && week.is_empty() {
                    log::debug!("generate response for {grade_level} has no streams");
                    continue;
                }
                b = b.stream(grade_level, stream, decode_week(week, stream));
            }
        }
        GenerateData::ByGrade(grades) => {
            let Some(streams) = grades.get(grade_level) else {
                let found: Vec<&str> = grades.keys().map(String::as_str).collect();
                return Err(IngestError::Unsuccessful(format!(
                    "generate response for {grade_level} carried only {}",
                    found.join(", ")
                )));
            };
            for grade in grades.keys().filter(|g| *g != grade_level) {
                log::warn!("generate response for {grade_level} also carries {grade}; ignored");
            }
            for (stream, week) in streams {
                b = b.stream(grade_level, stream, decode_week(week, stream));
            }
        }
    }
    Ok(b)
}

/// Add one stored record's streams. Streams are keyed by `className` when it
/// is set. A stream already present in the builder keeps its first version.
pub(crate) fn add_record(
    mut b: ScheduleBuilder,
    record: &TimetableRecord,
    fallback_grade: &str,
) -> ScheduleBuilder {
    let grade = if record.grade_level.trim().is_empty() {
        fallback_grade
    } else {
        record.grade_level.as_str()
    };

    for (key, data) in &record.streams {
        let stream = if data.class_name.trim().is_empty() {
            key.as_str()
        } else {
            data.class_name.as_str()
        };
        if b.has_stream(grade, stream) {
            log::warn!(
                "duplicate timetable for {grade} {stream} (record {:?}); keeping the first",
                record.id
            );
            continue;
        }
        b = b.stream(grade, stream, decode_week(&data.schedule, stream));
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use timetable_core::{PeriodEntry, SchoolDay};

    fn grades() -> Vec<String> {
        vec!["Form 1".to_string(), "Form 2".to_string()]
    }

    #[test]
    fn test_both_shapes_give_same_schedule() {
        let by_data = json!({
            "success": true,
            "data": {
                "Form 1A": {
                    "Monday": ["registration", ["Mathematics", "T001"], "Break"]
                }
            }
        });
        let by_record = json!({
            "success": true,
            "timetable_data": {
                "gradeLevel": "Form 1",
                "streams": {
                    "A": {
                        "className": "Form 1A",
                        "schedule": {
                            "Monday": ["registration", ["Mathematics", "T001"], "Break"]
                        }
                    }
                }
            }
        });

        let a = parse_generate_json(&by_data.to_string(), "Form 1", &grades()).unwrap();
        let b = parse_generate_json(&by_record.to_string(), "Form 1", &grades()).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.entry("Form 1", "Form 1A", SchoolDay::Monday, 1),
            Some(&PeriodEntry::lesson("Mathematics", "T001"))
        );
    }

    #[test]
    fn test_grade_keyed_data_is_unwrapped() {
        let resp = json!({
            "success": true,
            "data": {
                "Form 2": {
                    "Form 2B": { "Tuesday": [null, ["Physics", "T002"]] }
                }
            }
        });
        let s = parse_generate_json(&resp.to_string(), "Form 2", &grades()).unwrap();
        assert_eq!(s.streams("Form 2"), vec!["Form 2B"]);
        assert_eq!(
            s.entry("Form 2", "Form 2B", SchoolDay::Tuesday, 1),
            Some(&PeriodEntry::lesson("Physics", "T002"))
        );
    }

    #[test]
    fn test_foreign_grades_are_dropped() {
        let resp = json!({
            "success": true,
            "data": {
                "Form 1": { "Form 1A": { "Monday": [null, ["History", "T003"]] } },
                "Form 2": { "Form 2B": { "Tuesday": [null, ["Physics", "T002"]] } }
            }
        });
        let s = parse_generate_json(&resp.to_string(), "Form 2", &grades()).unwrap();
        assert_eq!(s.grade_levels(), vec!["Form 2"]);
        assert!(s.streams("Form 1").is_empty());
    }

    #[test]
    fn test_missing_requested_grade_is_an_error() {
        let resp = json!({
            "success": true,
            "data": { "Form 1": { "Form 1A": { "Monday": [null, ["History", "T003"]] } } }
        });
        let err = parse_generate_json(&resp.to_string(), "Form 2", &grades()).unwrap_err();
        assert!(err.to_string().contains("Form 1"));
    }

    #[test]
    fn test_empty_grade_wrapper_is_not_a_stream() {
        let resp = json!({"success": true, "data": {"Form 2": {}}});
        let s = parse_generate_json(&resp.to_string(), "Form 2", &grades()).unwrap();
        assert!(s.is_empty());
        assert!(s.streams("Form 2").is_empty());
    }

    #[test]
    fn test_unsuccessful_carries_message() {
        let resp = json!({"success": false, "message": "no teachers for Chemistry"});
        let err = parse_generate_json(&resp.to_string(), "Form 1", &grades()).unwrap_err();
        assert_eq!(err.to_string(), "Request failed: no teachers for Chemistry");
    }

    #[test]
    fn test_success_without_payload_is_an_error() {
        let resp = json!({"success": true});
        assert!(parse_generate_json(&resp.to_string(), "Form 1", &grades()).is_err());
    }
}

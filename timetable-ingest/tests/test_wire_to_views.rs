use serde_json::json;
use timetable_core::{
    SchoolCell, SchoolDay, WorkloadConfig, compute_workload, default_catalog, school_weekly_view,
    stream_view, teacher_view,
};
use timetable_ingest::{parse_generate_json, parse_list_json, records_to_schedule};

fn grades() -> Vec<String> {
    vec!["Form 1".to_string(), "Form 2".to_string()]
}

/// Stored records in the mixed shapes the backend actually returns.
fn stored() -> serde_json::Value {
    json!({
        "success": true,
        "data": [
            {
                "_id": "f2",
                "academicYear": "2026",
                "term": "1",
                "gradeLevel": "Form 2",
                "streams": {
                    "B": {
                        "className": "Form 2B",
                        "schedule": {
                            "Monday": [
                                "registration",
                                ["Mathematics", "T001"],
                                {"period_id": 3, "type": "lesson", "subject": "Chemistry", "teacher": "T006"}
                            ]
                        }
                    }
                }
            },
            {
                "_id": "f1",
                "academicYear": "2026",
                "term": "1",
                "gradeLevel": "Form 1",
                "streams": {
                    "A": {
                        "className": "Form 1A",
                        "schedule": {
                            "Monday": [
                                {"period_id": 1, "type": "registration"},
                                ["Mathematics", "T001"],
                                ["English", "T002"],
                                null,
                                ["Biology", "T003"],
                                "Break"
                            ]
                        }
                    }
                }
            }
        ]
    })
}

#[test]
fn test_records_feed_every_view() {
    let records = parse_list_json(&stored().to_string()).unwrap();
    let schedule = records_to_schedule(&records, &grades());
    let catalog = default_catalog();

    let rows = stream_view(&schedule, &catalog, "Form 1", "Form 1A", SchoolDay::Monday);
    let cells: Vec<String> = rows.iter().take(6).map(|r| r.cell.to_string()).collect();
    assert_eq!(
        cells,
        vec!["Registration", "Mathematics/T001", "English/T002", "Free", "Biology/T003", "Break"]
    );

    // Form 1 precedes Form 2 even though its record came second.
    let school = school_weekly_view(&schedule, &catalog, SchoolDay::Monday);
    match &school[1].cell {
        SchoolCell::Classes(entries) => {
            let streams: Vec<&str> = entries.iter().map(|e| e.class.stream.as_str()).collect();
            assert_eq!(streams, vec!["Form 1A", "Form 2B"]);
        }
        SchoolCell::Break => panic!("period 1 is not a break"),
    }

    // T001 is booked in both classes at period 1.
    let view = teacher_view(&schedule, "T001");
    assert_eq!(view.conflicts().len(), 1);
    let stat = compute_workload(&view, &WorkloadConfig::default());
    assert_eq!(stat.actual_workload, 2);
    assert!(stat.is_consistent());
}

#[test]
fn test_generated_fragment_replaces_stored_stream() {
    let records = parse_list_json(&stored().to_string()).unwrap();
    let stored = records_to_schedule(&records, &grades());

    let generated = json!({
        "success": true,
        "data": {
            "Form 2B": { "Monday": ["registration", ["Physics", "T005"]] }
        }
    });
    let fragment = parse_generate_json(&generated.to_string(), "Form 2", &grades()).unwrap();
    let merged = stored.merged_with(&fragment);

    assert_eq!(teacher_view(&merged, "T001").conflicts().len(), 0);
    assert_eq!(teacher_view(&stored, "T001").conflicts().len(), 1);
}

use timetable_core::{
    CanonicalSchedule, DaySchedule, PeriodCatalog, PeriodEntry, SchoolCell, SchoolDay, WallClock,
    WorkloadConfig, WorkloadStatus, compute_all, default_catalog, school_week, stream_view,
    stream_weekly_view, subject_color, teacher_view, utilization_percentage,
};

fn grades() -> Vec<String> {
    ["Form 1", "Form 2", "Form 3", "Form 4"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// A realistic day: registration, four lessons, break, four lessons, lunch,
/// extracurricular.
fn full_day(lessons: [(&str, &str); 8]) -> DaySchedule {
    let mut entries = vec![PeriodEntry::other("registration", None)];
    for (s, t) in &lessons[..4] {
        entries.push(PeriodEntry::lesson(*s, *t));
    }
    entries.push(PeriodEntry::Break);
    for (s, t) in &lessons[4..] {
        entries.push(PeriodEntry::lesson(*s, *t));
    }
    entries.push(PeriodEntry::other("break", Some("Lunch Break".to_string())));
    entries.push(PeriodEntry::other("extracurricular", Some("Clubs".to_string())));
    DaySchedule::from_entries(entries)
}

fn school() -> CanonicalSchedule {
    let f1a = [
        ("Mathematics", "T001"),
        ("English", "T002"),
        ("Biology", "T003"),
        ("History", "T004"),
        ("Physics", "T005"),
        ("Chemistry", "T006"),
        ("Geography", "T007"),
        ("Agriculture", "T008"),
    ];
    let f2b = [
        ("English", "T002"),
        ("Mathematics", "T009"),
        ("History", "T004"),
        ("Biology", "T003"),
        ("Chemistry", "T006"),
        ("Physics", "T005"),
        ("Agriculture", "T008"),
        ("Geography", "T007"),
    ];

    let mut b = CanonicalSchedule::builder(&grades());
    for day in SchoolDay::ALL {
        b = b
            .day("Form 2", "Form 2B", day, full_day(f2b))
            .day("Form 1", "Form 1A", day, full_day(f1a));
    }
    b.build()
}

#[test]
fn test_registration_lesson_break_stream_view() {
    let catalog = PeriodCatalog::default()
        .with_slot(WallClock::hm(7, 0), WallClock::hm(7, 5), "Registration")
        .with_slot(WallClock::hm(7, 5), WallClock::hm(7, 40), "Lesson")
        .with_slot(WallClock::hm(9, 25), WallClock::hm(9, 40), "Morning Break Time");
    let schedule = CanonicalSchedule::builder(&grades())
        .day(
            "Form 1",
            "Form 1A",
            SchoolDay::Monday,
            DaySchedule::from_entries(vec![
                PeriodEntry::other("registration", None),
                PeriodEntry::lesson("Mathematics", "T001"),
                PeriodEntry::Break,
            ]),
        )
        .build();

    let rows: Vec<String> = stream_view(&schedule, &catalog, "Form 1", "Form 1A", SchoolDay::Monday)
        .iter()
        .map(|r| format!("{} {}", r.slot.time_range(), r.cell))
        .collect();

    assert_eq!(
        rows,
        vec![
            "7:00 - 7:05 Registration",
            "7:05 - 7:40 Mathematics/T001",
            "9:25 - 9:40 Break",
        ]
    );
}

#[test]
fn test_underloaded_teacher_at_fifty_percent() {
    let config = WorkloadConfig::new(15, 25, 20);
    assert_eq!(utilization_percentage(10, config.target_workload), 50);
    assert_eq!(WorkloadStatus::classify(10, &config), WorkloadStatus::Underloaded);
}

#[test]
fn test_advanced_mathematics_is_blue() {
    assert_eq!(subject_color("Advanced Mathematics"), "blue");
}

#[test]
fn test_cross_grade_double_booking_is_reported() {
    let lesson_at_one =
        || DaySchedule::new(vec![None, Some(PeriodEntry::lesson("Mathematics", "T001"))]);
    let schedule = CanonicalSchedule::builder(&grades())
        .day("Form 2", "Form 2B", SchoolDay::Monday, lesson_at_one())
        .day("Form 1", "Form 1A", SchoolDay::Monday, lesson_at_one())
        .build();

    let view = teacher_view(&schedule, "T001");
    assert_eq!(view.conflicts().len(), 1);
    let c = &view.conflicts()[0];
    assert_eq!((c.day, c.index), (SchoolDay::Monday, 1));
    assert_eq!(c.class_a.stream, "Form 1A");
    assert_eq!(c.class_b.stream, "Form 2B");
}

#[test]
fn test_every_stream_view_matches_catalog_length() {
    let schedule = school();
    let catalog = default_catalog();
    for class in schedule.classes() {
        let week = stream_weekly_view(&schedule, &catalog, &class.grade_level, &class.stream);
        for (_, rows) in week {
            assert_eq!(rows.len(), catalog.len());
        }
    }
    // Selectors that match nothing.
    for (_, rows) in stream_weekly_view(&schedule, &catalog, "Form 4", "Form 4Z") {
        assert_eq!(rows.len(), catalog.len());
    }
}

#[test]
fn test_workload_histograms_sum_to_actual() {
    let stats = compute_all(&school(), &WorkloadConfig::default());
    assert_eq!(stats.len(), 9);
    for s in &stats {
        assert!(s.is_consistent(), "{} inconsistent", s.teacher_id);
    }

    // T002 teaches English in both classes every day.
    let t002 = stats.iter().find(|s| s.teacher_id == "T002").unwrap();
    assert_eq!(t002.actual_workload, 10);
    assert_eq!(t002.lessons_by_grade["Form 1"], 5);
    assert_eq!(t002.status, WorkloadStatus::Underloaded);
}

#[test]
fn test_no_double_booking_without_conflict_record() {
    let schedule = school();
    for id in schedule.teacher_ids() {
        let view = teacher_view(&schedule, &id);
        let extra = view.assignments().len() - view.lessons().count();
        assert_eq!(extra, view.conflicts().len());
    }
}

#[test]
fn test_school_week_is_deterministic_and_ordered() {
    let schedule = school();
    let catalog = default_catalog();
    let a = school_week(&schedule, &catalog);
    let b = school_week(&schedule, &catalog);
    assert_eq!(a, b);

    let (_, monday) = &a[0];
    match &monday[1].cell {
        SchoolCell::Classes(entries) => {
            let order: Vec<&str> = entries.iter().map(|e| e.class.stream.as_str()).collect();
            assert_eq!(order, vec!["Form 1A", "Form 2B"]);
        }
        SchoolCell::Break => panic!("slot 1 is a lesson"),
    }
    assert_eq!(monday[5].cell, SchoolCell::Break);
    assert_eq!(monday[10].cell, SchoolCell::Break);
}

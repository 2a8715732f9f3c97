//! Plain-text rendering of views for the terminal.

use std::fmt::Write;

use timetable_core::{
    Conflict, LegendEntry, PeriodCatalog, SchoolCell, SchoolDay, SchoolRow, StreamRow, SubjectShare,
    TeacherCell, TeacherRow, WorkloadConfig, WorkloadStat, WorkloadSummary, subject_color,
};

fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

pub fn periods(catalog: &PeriodCatalog) -> String {
    let mut out = String::new();
    for slot in catalog.slots() {
        let _ = writeln!(
            out,
            "{:>2}  {}  {:<16} {:?}",
            slot.index + 1,
            pad(&slot.time_range(), 13),
            slot.label,
            slot.kind
        );
    }
    out
}

pub fn stream_day(title: &str, rows: &[StreamRow]) -> String {
    let mut out = format!("{title}\n");
    for r in rows {
        let _ = writeln!(out, "  {}  {}", pad(&r.slot.time_range(), 13), r.cell);
    }
    out
}

pub fn stream_week(title: &str, week: &[(SchoolDay, Vec<StreamRow>)]) -> String {
    let mut out = format!("{title}\n");
    for (day, rows) in week {
        out.push_str(&stream_day(&format!("{day}:"), rows));
    }
    out
}

pub fn school_day(day: SchoolDay, rows: &[SchoolRow]) -> String {
    let mut out = format!("{day}\n");
    for r in rows {
        let cell = match &r.cell {
            SchoolCell::Break => "Break".to_string(),
            SchoolCell::Classes(entries) if entries.is_empty() => "-".to_string(),
            SchoolCell::Classes(entries) => entries
                .iter()
                .map(|e| format!("{}: {}", e.class, e.cell))
                .collect::<Vec<_>>()
                .join(" | "),
        };
        let _ = writeln!(out, "  {}  {}", pad(&r.slot.time_range(), 13), cell);
    }
    out
}

pub fn teacher_grid(teacher_id: &str, rows: &[TeacherRow]) -> String {
    let mut out = format!("Timetable for {teacher_id}\n");
    let _ = write!(out, "  {}", pad("Time", 13));
    for day in SchoolDay::ALL {
        let _ = write!(out, "  {}", pad(day.name(), 22));
    }
    out.push('\n');

    for r in rows {
        let _ = write!(out, "  {}", pad(&r.slot.time_range(), 13));
        for cell in &r.days {
            let text = match cell {
                TeacherCell::Blocked { label } => label.clone(),
                TeacherCell::Lesson { lesson } => format!("{} ({})", lesson.subject, lesson.class),
                TeacherCell::Free => "Free".to_string(),
            };
            let _ = write!(out, "  {}", pad(&text, 22));
        }
        out.push('\n');
    }
    out
}

pub fn conflicts(list: &[Conflict]) -> String {
    if list.is_empty() {
        return String::new();
    }
    let mut out = format!("WARNING: {} double booking(s)\n", list.len());
    for c in list {
        let _ = writeln!(
            out,
            "  {} period {}: {} in {} and {}",
            c.day,
            c.index + 1,
            c.teacher_id,
            c.class_a,
            c.class_b
        );
    }
    out
}

pub fn workload(
    stats: &[WorkloadStat],
    summary: &WorkloadSummary,
    config: &WorkloadConfig,
) -> String {
    let mut out = format!(
        "Teachers: {}  optimal: {} ({}%)  underloaded: {} ({}%)  overloaded: {} ({}%)  \
         avg utilization: {}%\n",
        summary.total_teachers,
        summary.optimal,
        summary.optimal_percentage,
        summary.underloaded,
        summary.underloaded_percentage,
        summary.overloaded,
        summary.overloaded_percentage,
        summary.average_utilization,
    );
    let _ = writeln!(
        out,
        "Thresholds: min {} / target {} / max {}\n",
        config.min_workload, config.target_workload, config.max_workload
    );

    for s in stats {
        let heavy: Vec<&str> = s.heavy_days(config).iter().map(|d| d.name()).collect();
        let _ = writeln!(
            out,
            "{:<10} {:>3}/{:<3} {:>4}%  {:<12} {:<7} {}{}",
            s.teacher_id,
            s.actual_workload,
            s.target_workload,
            s.utilization_percentage,
            s.status.as_str(),
            format!("{:?}", s.band()).to_lowercase(),
            s.subjects.iter().cloned().collect::<Vec<_>>().join(", "),
            if heavy.is_empty() {
                String::new()
            } else {
                format!("  heavy: {}", heavy.join(", "))
            }
        );
    }
    out
}

pub fn subjects(title: &str, dist: &[SubjectShare]) -> String {
    let mut out = format!("{title}\n");
    for s in dist {
        let _ = writeln!(
            out,
            "  {:<20} {:>3} {:>4}%  {}",
            s.subject,
            s.count,
            s.percentage,
            subject_color(&s.subject)
        );
    }
    out
}

pub fn legend(entries: &[LegendEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let _ = writeln!(out, "{:<20} {}", e.subject, e.color);
    }
    out
}

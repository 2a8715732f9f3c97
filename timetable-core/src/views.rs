//! View derivation: stream grids, the whole-school grid and teacher grids.
//!
//! All functions here are total. Unknown grade levels, streams, days or
//! teachers produce empty or all-Free views, never errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::day::SchoolDay;
use crate::entry::Cell;
use crate::period::{PeriodCatalog, PeriodSlot};
use crate::schedule::{CanonicalSchedule, ClassRef};
use crate::workload::rounded_percentage;

/// One row of a stream's daily grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRow {
    pub slot: PeriodSlot,
    pub cell: Cell,
}

/// Daily grid of one stream. Always exactly one row per catalog slot.
pub fn stream_view(
    schedule: &CanonicalSchedule,
    catalog: &PeriodCatalog,
    grade_level: &str,
    stream: &str,
    day: SchoolDay,
) -> Vec<StreamRow> {
    let day_schedule = schedule.day(grade_level, stream, day);
    catalog
        .slots()
        .iter()
        .map(|slot| StreamRow {
            slot: slot.clone(),
            cell: Cell::from_entry(day_schedule.and_then(|d| d.get(slot.index))),
        })
        .collect()
}

/// Monday..Friday grids of one stream.
pub fn stream_weekly_view(
    schedule: &CanonicalSchedule,
    catalog: &PeriodCatalog,
    grade_level: &str,
    stream: &str,
) -> Vec<(SchoolDay, Vec<StreamRow>)> {
    SchoolDay::ALL
        .iter()
        .map(|day| (*day, stream_view(schedule, catalog, grade_level, stream, *day)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub class: ClassRef,
    pub cell: Cell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "classes", rename_all = "lowercase")]
pub enum SchoolCell {
    /// The catalog slot is a break: one marker, whatever the classes hold.
    Break,
    /// Classes with something scheduled, in canonical class order. Empty
    /// renders as "-".
    Classes(Vec<ClassEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRow {
    pub slot: PeriodSlot,
    pub cell: SchoolCell,
}

/// Whole-school grid for one day: every class's entry at each slot.
pub fn school_weekly_view(
    schedule: &CanonicalSchedule,
    catalog: &PeriodCatalog,
    day: SchoolDay,
) -> Vec<SchoolRow> {
    let classes = schedule.classes();
    catalog
        .slots()
        .iter()
        .map(|slot| {
            if slot.is_break() {
                return SchoolRow {
                    slot: slot.clone(),
                    cell: SchoolCell::Break,
                };
            }

            let entries = classes
                .iter()
                .filter_map(|class| {
                    schedule
                        .entry(&class.grade_level, &class.stream, day, slot.index)
                        .map(|e| ClassEntry {
                            class: class.clone(),
                            cell: e.render(),
                        })
                })
                .collect();

            SchoolRow {
                slot: slot.clone(),
                cell: SchoolCell::Classes(entries),
            }
        })
        .collect()
}

/// The whole-school grid for every day of the week.
pub fn school_week(
    schedule: &CanonicalSchedule,
    catalog: &PeriodCatalog,
) -> Vec<(SchoolDay, Vec<SchoolRow>)> {
    SchoolDay::ALL
        .iter()
        .map(|day| (*day, school_weekly_view(schedule, catalog, *day)))
        .collect()
}

/// A lesson a teacher is scheduled for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherLesson {
    pub day: SchoolDay,
    pub index: usize,
    pub subject: String,
    pub class: ClassRef,
}

/// Two classes booking the same teacher in the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub teacher_id: String,
    pub day: SchoolDay,
    pub index: usize,
    pub class_a: ClassRef,
    pub class_b: ClassRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherView {
    pub teacher_id: String,
    /// First booking per (day, index) in canonical class order.
    cells: BTreeMap<(SchoolDay, usize), TeacherLesson>,
    /// Every booking found, double bookings included.
    assignments: Vec<TeacherLesson>,
    conflicts: Vec<Conflict>,
}

impl TeacherView {
    /// Build from bookings already in canonical order. The first booking of a
    /// slot keeps the cell; each later one is recorded as a conflict with it.
    pub fn from_assignments(
        teacher_id: impl Into<String>,
        assignments: Vec<TeacherLesson>,
    ) -> Self {
        let teacher_id = teacher_id.into();
        let mut cells: BTreeMap<(SchoolDay, usize), TeacherLesson> = BTreeMap::new();
        let mut conflicts = Vec::new();

        for lesson in &assignments {
            let key = (lesson.day, lesson.index);
            match cells.get(&key) {
                Some(kept) => {
                    log::warn!(
                        "teacher {} double-booked on {} period {}: {} and {}",
                        teacher_id,
                        lesson.day,
                        lesson.index,
                        kept.class,
                        lesson.class
                    );
                    conflicts.push(Conflict {
                        teacher_id: teacher_id.clone(),
                        day: lesson.day,
                        index: lesson.index,
                        class_a: kept.class.clone(),
                        class_b: lesson.class.clone(),
                    });
                }
                None => {
                    cells.insert(key, lesson.clone());
                }
            }
        }

        Self {
            teacher_id,
            cells,
            assignments,
            conflicts,
        }
    }

    pub fn get(&self, day: SchoolDay, index: usize) -> Option<&TeacherLesson> {
        self.cells.get(&(day, index))
    }

    /// Lessons in the cell map, ordered by (day, index).
    pub fn lessons(&self) -> impl Iterator<Item = &TeacherLesson> {
        self.cells.values()
    }

    /// The full week's bookings, double bookings included.
    pub fn assignments(&self) -> &[TeacherLesson] {
        &self.assignments
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Scan every class for lessons taught by `teacher_id`.
pub fn teacher_view(schedule: &CanonicalSchedule, teacher_id: &str) -> TeacherView {
    let assignments = schedule
        .cells()
        .into_iter()
        .filter_map(|c| match c.entry.as_lesson() {
            Some((subject, t)) if t == teacher_id => Some(TeacherLesson {
                day: c.day,
                index: c.index,
                subject: subject.to_string(),
                class: c.class_ref(),
            }),
            _ => None,
        })
        .collect();

    TeacherView::from_assignments(teacher_id, assignments)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TeacherCell {
    /// Break, registration or extracurricular: shows the slot label.
    Blocked { label: String },
    Lesson { lesson: TeacherLesson },
    Free,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRow {
    pub slot: PeriodSlot,
    /// One cell per school day, Monday first.
    pub days: Vec<TeacherCell>,
}

/// Period x day grid of a teacher's week.
pub fn teacher_grid(view: &TeacherView, catalog: &PeriodCatalog) -> Vec<TeacherRow> {
    catalog
        .slots()
        .iter()
        .map(|slot| {
            let days = SchoolDay::ALL
                .iter()
                .map(|day| {
                    if slot.is_non_teaching() {
                        TeacherCell::Blocked {
                            label: slot.label.clone(),
                        }
                    } else {
                        match view.get(*day, slot.index) {
                            Some(lesson) => TeacherCell::Lesson {
                                lesson: lesson.clone(),
                            },
                            None => TeacherCell::Free,
                        }
                    }
                })
                .collect();
            TeacherRow {
                slot: slot.clone(),
                days,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectShare {
    pub subject: String,
    pub count: u32,
    pub percentage: u32,
}

/// Lessons per subject across one stream's week, most frequent first.
pub fn subject_distribution(
    schedule: &CanonicalSchedule,
    grade_level: &str,
    stream: &str,
) -> Vec<SubjectShare> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    if let Some(week) = schedule.week(grade_level, stream) {
        for day_schedule in week.values() {
            for (_, entry) in day_schedule.entries() {
                if let Some((subject, _)) = entry.as_lesson() {
                    *counts.entry(subject.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    let total: u32 = counts.values().sum();
    let mut out: Vec<SubjectShare> = counts
        .into_iter()
        .map(|(subject, count)| SubjectShare {
            subject,
            count,
            percentage: rounded_percentage(count, total),
        })
        .collect();

    // Stable sort keeps the alphabetical order among equal counts.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

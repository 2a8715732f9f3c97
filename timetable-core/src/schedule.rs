//! Canonical schedule: grade level -> stream -> day -> day schedule.
//!
//! A `CanonicalSchedule` is never mutated after it is built. A new fetch
//! produces a new value (see [`CanonicalSchedule::merged_with`]), so views can
//! be memoized on the schedule's identity.
//!
//! Iteration order is explicit everywhere: grade levels in their declared
//! order, streams alphabetically, days Monday..Friday, periods by index.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::day::SchoolDay;
use crate::entry::PeriodEntry;

/// Entries of one day, positionally aligned with the period catalog.
///
/// Gaps (`None`) and missing trailing entries both mean "Free".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    slots: Vec<Option<PeriodEntry>>,
}

impl DaySchedule {
    pub fn new(slots: Vec<Option<PeriodEntry>>) -> Self {
        Self { slots }
    }

    pub fn from_entries(entries: Vec<PeriodEntry>) -> Self {
        Self {
            slots: entries.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PeriodEntry> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    /// Occupied slots with their index.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &PeriodEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|e| (i, e)))
    }
}

/// One class: a stream within a grade level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassRef {
    pub grade_level: String,
    pub stream: String,
}

impl ClassRef {
    pub fn new(grade_level: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            grade_level: grade_level.into(),
            stream: stream.into(),
        }
    }
}

impl ClassRef {
    /// Sort key matching [`CanonicalSchedule::classes`]: declared grades in
    /// declared order, then undeclared grades and streams alphabetically.
    pub fn canonical_key<'a>(&'a self, grade_order: &[String]) -> (usize, &'a str, &'a str) {
        let rank = grade_order
            .iter()
            .position(|g| *g == self.grade_level)
            .unwrap_or(grade_order.len());
        (rank, &self.grade_level, &self.stream)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stream)
    }
}

pub type StreamWeek = BTreeMap<SchoolDay, DaySchedule>;

/// One occupied cell of the schedule, as yielded by [`CanonicalSchedule::cells`].
#[derive(Debug, Clone, Copy)]
pub struct ScheduleCell<'a> {
    pub grade_level: &'a str,
    pub stream: &'a str,
    pub day: SchoolDay,
    pub index: usize,
    pub entry: &'a PeriodEntry,
}

impl ScheduleCell<'_> {
    pub fn class_ref(&self) -> ClassRef {
        ClassRef::new(self.grade_level, self.stream)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSchedule {
    grade_order: Vec<String>,
    grades: BTreeMap<String, BTreeMap<String, StreamWeek>>,
}

impl CanonicalSchedule {
    pub fn builder(grade_order: &[String]) -> ScheduleBuilder {
        ScheduleBuilder {
            inner: CanonicalSchedule {
                grade_order: grade_order.to_vec(),
                grades: BTreeMap::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.grades.values().all(|s| s.is_empty())
    }

    /// Grade levels present in the schedule, declared ones first (in declared
    /// order), then any undeclared ones alphabetically.
    pub fn grade_levels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .grade_order
            .iter()
            .map(String::as_str)
            .filter(|g| self.grades.contains_key(*g))
            .collect();
        for g in self.grades.keys() {
            if !self.grade_order.iter().any(|d| d == g) {
                out.push(g);
            }
        }
        out
    }

    /// Streams of a grade, alphabetically. Unknown grade -> empty.
    pub fn streams(&self, grade_level: &str) -> Vec<&str> {
        self.grades
            .get(grade_level)
            .map(|s| s.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every class in canonical order.
    pub fn classes(&self) -> Vec<ClassRef> {
        self.grade_levels()
            .into_iter()
            .flat_map(|g| self.streams(g).into_iter().map(move |s| ClassRef::new(g, s)))
            .collect()
    }

    /// Grade level owning a stream name, if any.
    pub fn grade_of(&self, stream: &str) -> Option<&str> {
        self.grade_levels()
            .into_iter()
            .find(|g| self.grades.get(*g).is_some_and(|s| s.contains_key(stream)))
    }

    pub fn week(&self, grade_level: &str, stream: &str) -> Option<&StreamWeek> {
        self.grades.get(grade_level)?.get(stream)
    }

    pub fn day(&self, grade_level: &str, stream: &str, day: SchoolDay) -> Option<&DaySchedule> {
        self.week(grade_level, stream)?.get(&day)
    }

    pub fn entry(
        &self,
        grade_level: &str,
        stream: &str,
        day: SchoolDay,
        index: usize,
    ) -> Option<&PeriodEntry> {
        self.day(grade_level, stream, day)?.get(index)
    }

    /// Every occupied cell in canonical order.
    pub fn cells(&self) -> Vec<ScheduleCell<'_>> {
        let mut out = Vec::new();
        for grade in self.grade_levels() {
            let Some(streams) = self.grades.get(grade) else {
                continue;
            };
            for (stream, week) in streams {
                for (day, schedule) in week {
                    for (index, entry) in schedule.entries() {
                        out.push(ScheduleCell {
                            grade_level: grade,
                            stream,
                            day: *day,
                            index,
                            entry,
                        });
                    }
                }
            }
        }
        out
    }

    /// Teacher ids referenced by any lesson, sorted.
    pub fn teacher_ids(&self) -> BTreeSet<String> {
        self.cells()
            .iter()
            .filter_map(|c| c.entry.as_lesson().map(|(_, t)| t.to_string()))
            .collect()
    }

    /// A schedule holding only one class.
    pub fn only_class(&self, class: &ClassRef) -> CanonicalSchedule {
        let mut b = CanonicalSchedule::builder(&self.grade_order);
        if let Some(week) = self.week(&class.grade_level, &class.stream) {
            b = b.stream(&class.grade_level, &class.stream, week.clone());
        }
        b.build()
    }

    /// A new schedule: `self` with every stream in `fragment` replacing (or
    /// adding to) the stream of the same grade and name.
    pub fn merged_with(&self, fragment: &CanonicalSchedule) -> CanonicalSchedule {
        let mut b = ScheduleBuilder {
            inner: self.clone(),
        };
        for (grade, streams) in &fragment.grades {
            for (stream, week) in streams {
                b = b.stream(grade, stream, week.clone());
            }
        }
        b.build()
    }
}

/// Accumulates a schedule; [`ScheduleBuilder::build`] freezes it.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    inner: CanonicalSchedule,
}

impl ScheduleBuilder {
    pub fn day(
        mut self,
        grade_level: &str,
        stream: &str,
        day: SchoolDay,
        schedule: DaySchedule,
    ) -> Self {
        self.inner
            .grades
            .entry(grade_level.to_string())
            .or_default()
            .entry(stream.to_string())
            .or_default()
            .insert(day, schedule);
        self
    }

    pub fn stream(mut self, grade_level: &str, stream: &str, week: StreamWeek) -> Self {
        self.inner
            .grades
            .entry(grade_level.to_string())
            .or_default()
            .insert(stream.to_string(), week);
        self
    }

    pub fn has_stream(&self, grade_level: &str, stream: &str) -> bool {
        self.inner.week(grade_level, stream).is_some()
    }

    pub fn build(self) -> CanonicalSchedule {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grades() -> Vec<String> {
        vec!["Form 1".to_string(), "Form 2".to_string()]
    }

    fn sample() -> CanonicalSchedule {
        CanonicalSchedule::builder(&grades())
            .day(
                "Form 2",
                "Form 2B",
                SchoolDay::Monday,
                DaySchedule::from_entries(vec![PeriodEntry::lesson("Physics", "T002")]),
            )
            .day(
                "Form 1",
                "Form 1B",
                SchoolDay::Monday,
                DaySchedule::from_entries(vec![PeriodEntry::Break]),
            )
            .day(
                "Form 1",
                "Form 1A",
                SchoolDay::Tuesday,
                DaySchedule::new(vec![None, Some(PeriodEntry::lesson("Biology", "T001"))]),
            )
            .day(
                "Extra",
                "Remedial",
                SchoolDay::Friday,
                DaySchedule::from_entries(vec![PeriodEntry::lesson("English", "T003")]),
            )
            .build()
    }

    #[test]
    fn test_class_order_is_declared_then_alpha() {
        let s = sample();
        let names: Vec<String> = s.classes().iter().map(|c| c.stream.clone()).collect();
        assert_eq!(names, vec!["Form 1A", "Form 1B", "Form 2B", "Remedial"]);
    }

    #[test]
    fn test_missing_lookups_are_none() {
        let s = sample();
        assert!(s.day("Form 9", "X", SchoolDay::Monday).is_none());
        assert!(s.entry("Form 1", "Form 1A", SchoolDay::Tuesday, 0).is_none());
        assert!(s.entry("Form 1", "Form 1A", SchoolDay::Tuesday, 7).is_none());
        assert!(s.streams("Form 9").is_empty());
    }

    #[test]
    fn test_cells_skip_gaps() {
        let s = sample();
        let cells = s.cells();
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].stream, "Form 1A");
        assert_eq!(cells[0].index, 1);
    }

    #[test]
    fn test_merge_returns_new_schedule() {
        let s = sample();
        let fragment = CanonicalSchedule::builder(&grades())
            .day(
                "Form 2",
                "Form 2B",
                SchoolDay::Monday,
                DaySchedule::from_entries(vec![PeriodEntry::lesson("Chemistry", "T004")]),
            )
            .build();
        let merged = s.merged_with(&fragment);

        assert_eq!(
            s.entry("Form 2", "Form 2B", SchoolDay::Monday, 0),
            Some(&PeriodEntry::lesson("Physics", "T002"))
        );
        assert_eq!(
            merged.entry("Form 2", "Form 2B", SchoolDay::Monday, 0),
            Some(&PeriodEntry::lesson("Chemistry", "T004"))
        );
        assert_eq!(merged.classes().len(), 4);
    }

    #[test]
    fn test_teacher_ids() {
        let ids: Vec<String> = sample().teacher_ids().into_iter().collect();
        assert_eq!(ids, vec!["T001", "T002", "T003"]);
    }
}

//! Teacher workload analytics.
//!
//! Thresholds always come from a [`WorkloadConfig`] passed in by the caller.
//! Stats computed under an older config can be brought up to date with
//! [`WorkloadStat::restatus`].

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::day::SchoolDay;
use crate::schedule::CanonicalSchedule;
use crate::views::{TeacherView, teacher_view};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    pub min_workload: u32,
    pub max_workload: u32,
    pub target_workload: u32,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            min_workload: 15,
            max_workload: 25,
            target_workload: 24,
        }
    }
}

impl WorkloadConfig {
    pub fn new(min_workload: u32, max_workload: u32, target_workload: u32) -> Self {
        Self {
            min_workload,
            max_workload,
            target_workload,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_workload >= self.max_workload {
            bail!(
                "min_workload ({}) must be less than max_workload ({})",
                self.min_workload,
                self.max_workload
            );
        }
        if self.target_workload < self.min_workload || self.target_workload > self.max_workload {
            bail!(
                "target_workload ({}) must be between min_workload ({}) and max_workload ({})",
                self.target_workload,
                self.min_workload,
                self.max_workload
            );
        }
        Ok(())
    }

    /// Lessons per day above which a day counts as heavy.
    pub fn heavy_day_threshold(&self) -> f64 {
        self.target_workload as f64 / SchoolDay::ALL.len() as f64 * 1.2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadStatus {
    Underloaded,
    Optimal,
    Overloaded,
}

impl WorkloadStatus {
    pub fn classify(actual: u32, config: &WorkloadConfig) -> Self {
        if actual < config.min_workload {
            WorkloadStatus::Underloaded
        } else if actual > config.max_workload {
            WorkloadStatus::Overloaded
        } else {
            WorkloadStatus::Optimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadStatus::Underloaded => "underloaded",
            WorkloadStatus::Optimal => "optimal",
            WorkloadStatus::Overloaded => "overloaded",
        }
    }
}

/// Where utilization sits relative to the target, for gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationBand {
    Below,
    Within,
    Above,
}

impl UtilizationBand {
    pub fn of(percentage: u32) -> Self {
        if percentage < 80 {
            UtilizationBand::Below
        } else if percentage > 110 {
            UtilizationBand::Above
        } else {
            UtilizationBand::Within
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadStat {
    pub teacher_id: String,
    pub subjects: BTreeSet<String>,
    pub target_workload: u32,
    pub actual_workload: u32,
    pub utilization_percentage: u32,
    pub status: WorkloadStatus,
    pub lessons_by_subject: BTreeMap<String, u32>,
    pub lessons_by_grade: BTreeMap<String, u32>,
    pub lessons_by_day: BTreeMap<SchoolDay, u32>,
}

impl WorkloadStat {
    /// Re-evaluate target, utilization and status under `config`.
    pub fn restatus(&self, config: &WorkloadConfig) -> WorkloadStat {
        WorkloadStat {
            target_workload: config.target_workload,
            utilization_percentage: utilization_percentage(
                self.actual_workload,
                config.target_workload,
            ),
            status: WorkloadStatus::classify(self.actual_workload, config),
            ..self.clone()
        }
    }

    /// Histogram totals agree with `actual_workload`.
    pub fn is_consistent(&self) -> bool {
        let by_day: u32 = self.lessons_by_day.values().sum();
        let by_subject: u32 = self.lessons_by_subject.values().sum();
        let by_grade: u32 = self.lessons_by_grade.values().sum();
        by_day == self.actual_workload
            && by_subject == self.actual_workload
            && by_grade == self.actual_workload
    }

    pub fn band(&self) -> UtilizationBand {
        UtilizationBand::of(self.utilization_percentage)
    }

    /// Days whose lesson count is above the heavy-day threshold.
    pub fn heavy_days(&self, config: &WorkloadConfig) -> Vec<SchoolDay> {
        let threshold = config.heavy_day_threshold();
        self.lessons_by_day
            .iter()
            .filter(|(_, n)| **n as f64 > threshold)
            .map(|(d, _)| *d)
            .collect()
    }
}

/// `round(actual / target * 100)`; a zero target yields 0.
pub fn utilization_percentage(actual: u32, target: u32) -> u32 {
    rounded_percentage(actual, target)
}

/// `part` as a whole-number percentage of `total`; 0 when `total` is 0.
pub(crate) fn rounded_percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Stats over every booking in the view, double bookings included.
pub fn compute_workload(view: &TeacherView, config: &WorkloadConfig) -> WorkloadStat {
    let mut subjects = BTreeSet::new();
    let mut lessons_by_subject: BTreeMap<String, u32> = BTreeMap::new();
    let mut lessons_by_grade: BTreeMap<String, u32> = BTreeMap::new();
    let mut lessons_by_day: BTreeMap<SchoolDay, u32> = BTreeMap::new();

    for lesson in view.assignments() {
        subjects.insert(lesson.subject.clone());
        *lessons_by_subject.entry(lesson.subject.clone()).or_insert(0) += 1;
        *lessons_by_grade
            .entry(lesson.class.grade_level.clone())
            .or_insert(0) += 1;
        *lessons_by_day.entry(lesson.day).or_insert(0) += 1;
    }

    let actual = view.assignments().len() as u32;

    WorkloadStat {
        teacher_id: view.teacher_id.clone(),
        subjects,
        target_workload: config.target_workload,
        actual_workload: actual,
        utilization_percentage: utilization_percentage(actual, config.target_workload),
        status: WorkloadStatus::classify(actual, config),
        lessons_by_subject,
        lessons_by_grade,
        lessons_by_day,
    }
}

/// One stat per teacher referenced in the schedule, sorted by teacher id.
pub fn compute_all(schedule: &CanonicalSchedule, config: &WorkloadConfig) -> Vec<WorkloadStat> {
    schedule
        .teacher_ids()
        .iter()
        .map(|id| compute_workload(&teacher_view(schedule, id), config))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSummary {
    pub total_teachers: u32,
    pub optimal: u32,
    pub underloaded: u32,
    pub overloaded: u32,
    pub optimal_percentage: u32,
    pub underloaded_percentage: u32,
    pub overloaded_percentage: u32,
    pub average_utilization: u32,
}

/// Fleet-wide status counts.
pub fn summarize(stats: &[WorkloadStat]) -> WorkloadSummary {
    let total = stats.len() as u32;
    let count = |s: WorkloadStatus| stats.iter().filter(|w| w.status == s).count() as u32;
    let optimal = count(WorkloadStatus::Optimal);
    let underloaded = count(WorkloadStatus::Underloaded);
    let overloaded = count(WorkloadStatus::Overloaded);

    let pct = |n: u32| rounded_percentage(n, total);
    let average_utilization = if total == 0 {
        0
    } else {
        let sum: u32 = stats.iter().map(|w| w.utilization_percentage).sum();
        (sum as f64 / total as f64).round() as u32
    };

    WorkloadSummary {
        total_teachers: total,
        optimal,
        underloaded,
        overloaded,
        optimal_percentage: pct(optimal),
        underloaded_percentage: pct(underloaded),
        overloaded_percentage: pct(overloaded),
        average_utilization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::PeriodEntry;
    use crate::schedule::DaySchedule;

    fn schedule() -> CanonicalSchedule {
        let grades = vec!["Form 1".to_string(), "Form 2".to_string()];
        CanonicalSchedule::builder(&grades)
            .day(
                "Form 1",
                "Form 1A",
                SchoolDay::Monday,
                DaySchedule::from_entries(vec![
                    PeriodEntry::other("registration", None),
                    PeriodEntry::lesson("Mathematics", "T001"),
                    PeriodEntry::lesson("Physics", "T001"),
                    PeriodEntry::Break,
                ]),
            )
            .day(
                "Form 2",
                "Form 2A",
                SchoolDay::Tuesday,
                DaySchedule::from_entries(vec![
                    PeriodEntry::other("registration", None),
                    PeriodEntry::lesson("Mathematics", "T001"),
                    PeriodEntry::lesson("English", "T002"),
                ]),
            )
            .build()
    }

    #[test]
    fn test_shares_and_utilization_round_alike() {
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(utilization_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(5, 0), 0);
    }

    #[test]
    fn test_underloaded_at_half_target() {
        let config = WorkloadConfig::new(15, 25, 20);
        assert_eq!(utilization_percentage(10, config.target_workload), 50);
        assert_eq!(WorkloadStatus::classify(10, &config), WorkloadStatus::Underloaded);
    }

    #[test]
    fn test_status_boundaries_are_inclusive() {
        let config = WorkloadConfig::default();
        assert_eq!(WorkloadStatus::classify(15, &config), WorkloadStatus::Optimal);
        assert_eq!(WorkloadStatus::classify(25, &config), WorkloadStatus::Optimal);
        assert_eq!(WorkloadStatus::classify(26, &config), WorkloadStatus::Overloaded);
    }

    #[test]
    fn test_compute_workload_histograms_agree() {
        let s = schedule();
        let stat = compute_workload(&teacher_view(&s, "T001"), &WorkloadConfig::default());
        assert_eq!(stat.actual_workload, 3);
        assert!(stat.is_consistent());
        assert_eq!(stat.lessons_by_subject["Mathematics"], 2);
        assert_eq!(stat.lessons_by_grade["Form 2"], 1);
        assert_eq!(stat.lessons_by_day[&SchoolDay::Monday], 2);
        assert_eq!(stat.utilization_percentage, 13);
    }

    #[test]
    fn test_zero_target_does_not_divide() {
        assert_eq!(utilization_percentage(5, 0), 0);
    }

    #[test]
    fn test_restatus_follows_config() {
        let s = schedule();
        let stat = compute_workload(&teacher_view(&s, "T001"), &WorkloadConfig::default());
        assert_eq!(stat.status, WorkloadStatus::Underloaded);

        let relaxed = WorkloadConfig::new(1, 3, 2);
        let updated = stat.restatus(&relaxed);
        assert_eq!(updated.status, WorkloadStatus::Optimal);
        assert_eq!(updated.utilization_percentage, 150);
        assert_eq!(updated.band(), UtilizationBand::Above);
        assert_eq!(updated.actual_workload, stat.actual_workload);
    }

    #[test]
    fn test_heavy_days() {
        let s = schedule();
        let stat = compute_workload(&teacher_view(&s, "T001"), &WorkloadConfig::default());
        // 24 / 5 * 1.2 = 5.76
        assert!(stat.heavy_days(&WorkloadConfig::default()).is_empty());
        // 5 / 5 * 1.2 = 1.2
        let small = WorkloadConfig::new(1, 6, 5);
        assert_eq!(stat.heavy_days(&small), vec![SchoolDay::Monday]);
    }

    #[test]
    fn test_compute_all_and_summary() {
        let stats = compute_all(&schedule(), &WorkloadConfig::new(1, 2, 2));
        let ids: Vec<&str> = stats.iter().map(|s| s.teacher_id.as_str()).collect();
        assert_eq!(ids, vec!["T001", "T002"]);

        let summary = summarize(&stats);
        assert_eq!(summary.total_teachers, 2);
        assert_eq!(summary.overloaded, 1);
        assert_eq!(summary.optimal, 1);
        assert_eq!(summary.overloaded_percentage, 50);
        assert_eq!(summarize(&[]), WorkloadSummary::default());
    }

    #[test]
    fn test_validate() {
        assert!(WorkloadConfig::default().validate().is_ok());
        assert!(WorkloadConfig::new(25, 15, 20).validate().is_err());
        assert!(WorkloadConfig::new(15, 25, 30).validate().is_err());
    }

    #[test]
    fn test_band() {
        assert_eq!(UtilizationBand::of(79), UtilizationBand::Below);
        assert_eq!(UtilizationBand::of(80), UtilizationBand::Within);
        assert_eq!(UtilizationBand::of(110), UtilizationBand::Within);
        assert_eq!(UtilizationBand::of(111), UtilizationBand::Above);
    }
}

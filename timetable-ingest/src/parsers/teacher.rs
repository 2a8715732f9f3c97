//! Teacher endpoints: `GET /timetable/teacher/{id}` and `GET /timetable/teacher/workload`.

use std::collections::BTreeMap;

use timetable_core::{
    ClassRef, SchoolDay, TeacherLesson, TeacherView, WorkloadConfig, WorkloadStat, WorkloadStatus,
};

use crate::decode::parse_day_name;
use crate::error::{IngestError, Result};
use crate::types::{Envelope, TeacherTimetableResponse, WireWorkloadStat};

/// A server-computed stat, re-evaluated against local thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerWorkload {
    pub teacher_name: Option<String>,
    pub stat: WorkloadStat,
}

#[derive(Debug, Clone)]
pub struct TeacherReport {
    pub teacher_name: Option<String>,
    pub department: Option<String>,
    pub subjects: Vec<String>,
    pub view: TeacherView,
    pub server_workload: Option<ServerWorkload>,
}

impl WireWorkloadStat {
    /// Counts are taken as sent; target, utilization and status follow
    /// `config`.
    pub fn to_stat(&self, config: &WorkloadConfig) -> ServerWorkload {
        let mut lessons_by_day = BTreeMap::new();
        for (name, n) in &self.lessons_by_day {
            match parse_day_name(name) {
                Ok(day) => {
                    lessons_by_day.insert(day, *n);
                }
                Err(err) => log::warn!("workload for {}: {err}; skipped", self.teacher_id),
            }
        }

        let sent = WorkloadStat {
            teacher_id: self.teacher_id.clone(),
            subjects: self.subjects.iter().cloned().collect(),
            target_workload: self.target_workload.round() as u32,
            actual_workload: self.actual_workload,
            utilization_percentage: self.utilization_percentage.round() as u32,
            status: self.sent_status(),
            lessons_by_subject: self.lessons_by_subject.clone(),
            lessons_by_grade: self.lessons_by_grade.clone(),
            lessons_by_day,
        };

        ServerWorkload {
            teacher_name: self.teacher_name.clone(),
            stat: sent.restatus(config),
        }
    }

    /// The status as the server reported it; unknown values read as optimal
    /// and are replaced by [`WorkloadStat::restatus`] anyway.
    fn sent_status(&self) -> WorkloadStatus {
        match self.status.as_deref() {
            Some("underloaded") => WorkloadStatus::Underloaded,
            Some("overloaded") => WorkloadStatus::Overloaded,
            _ => WorkloadStatus::Optimal,
        }
    }
}

pub fn parse_teacher_json(
    json: &str,
    teacher_id: &str,
    grade_order: &[String],
    config: &WorkloadConfig,
) -> Result<TeacherReport> {
    let resp: TeacherTimetableResponse = serde_json::from_str(json)?;
    teacher_response_to_report(&resp, teacher_id, grade_order, config)
}

/// Build a teacher view from the endpoint's per-day lesson lists. Periods are
/// 1-based on the wire. Two lessons in the same slot become a conflict, the
/// class first in canonical order keeping the slot.
pub fn teacher_response_to_report(
    resp: &TeacherTimetableResponse,
    teacher_id: &str,
    grade_order: &[String],
    config: &WorkloadConfig,
) -> Result<TeacherReport> {
    if !resp.success {
        return Err(IngestError::Unsuccessful(
            resp.message
                .clone()
                .unwrap_or_else(|| format!("teacher timetable request failed for {teacher_id}")),
        ));
    }

    let mut lessons: Vec<TeacherLesson> = Vec::new();
    for (day_name, infos) in &resp.schedule {
        let day: SchoolDay = match parse_day_name(day_name) {
            Ok(d) => d,
            Err(err) => {
                log::warn!("teacher {teacher_id}: {err}; skipped");
                continue;
            }
        };
        for info in infos {
            let Some(index) = info.period.checked_sub(1) else {
                log::warn!("teacher {teacher_id}: period 0 on {day} for {}; skipped", info.class);
                continue;
            };
            lessons.push(TeacherLesson {
                day,
                index,
                subject: info.subject.clone(),
                class: ClassRef::new(&info.grade_level, &info.class),
            });
        }
    }
    lessons.sort_by(|a, b| {
        (a.day, a.index, a.class.canonical_key(grade_order))
            .cmp(&(b.day, b.index, b.class.canonical_key(grade_order)))
    });

    Ok(TeacherReport {
        teacher_name: resp.teacher_name.clone(),
        department: resp.department.clone(),
        subjects: resp.subjects.clone(),
        view: TeacherView::from_assignments(teacher_id, lessons),
        server_workload: resp.workload_stats.as_ref().map(|w| w.to_stat(config)),
    })
}

pub fn parse_workload_json(json: &str, config: &WorkloadConfig) -> Result<Vec<ServerWorkload>> {
    let env: Envelope<Vec<WireWorkloadStat>> = serde_json::from_str(json)?;
    if !env.success {
        return Err(IngestError::Unsuccessful(
            env.message.unwrap_or_else(|| "workload request failed".to_string()),
        ));
    }
    Ok(env
        .data
        .unwrap_or_default()
        .iter()
        .map(|w| w.to_stat(config))
        .collect())
}

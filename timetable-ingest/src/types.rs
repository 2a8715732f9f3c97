//! Wire types for the timetable API payloads.
//!
//! These mirror the JSON as sent. Nothing outside this crate sees them; the
//! parsers turn them into `timetable_core` types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A period entry in any of the shapes the generator emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPeriodEntry {
    /// `"Break"`, `"Free"`, or a bare activity type
    Sentinel(String),
    /// `[subject, teacher]`
    Pair(String, String),
    Object(RawPeriodObject),
    Unrecognized(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPeriodObject {
    #[serde(default)]
    pub period_id: Option<Value>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, alias = "teacherId", alias = "teacher_id")]
    pub teacher: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// day name -> entries. `null` items are kept so positions line up.
pub type RawWeek = BTreeMap<String, Vec<Option<RawPeriodEntry>>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamData {
    #[serde(rename = "className", default)]
    pub class_name: String,
    #[serde(default)]
    pub schedule: RawWeek,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub academic_year: String,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub grade_level: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub streams: BTreeMap<String, StreamData>,
}

/// `{success, data?, message?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` of a generate response: keyed by stream, or by grade level then stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerateData {
    ByStream(BTreeMap<String, RawWeek>),
    ByGrade(BTreeMap<String, BTreeMap<String, RawWeek>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<GenerateData>,
    #[serde(default)]
    pub timetable_data: Option<TimetableRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One lesson as listed by the teacher endpoint. `period` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodInfo {
    pub subject: String,
    #[serde(default)]
    pub subject_code: Option<String>,
    pub class: String,
    #[serde(default)]
    pub grade_level: String,
    pub period: usize,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireWorkloadStat {
    pub teacher_id: String,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub target_workload: f64,
    #[serde(default)]
    pub actual_workload: u32,
    #[serde(default)]
    pub utilization_percentage: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub lessons_by_subject: BTreeMap<String, u32>,
    #[serde(default)]
    pub lessons_by_grade: BTreeMap<String, u32>,
    #[serde(default)]
    pub lessons_by_day: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherTimetableResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub schedule: BTreeMap<String, Vec<PeriodInfo>>,
    #[serde(rename = "teacherName", default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub workload_stats: Option<WireWorkloadStat>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One slot of `/timeslots/configurations/periods`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPeriodConfig {
    pub start: String,
    pub end: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

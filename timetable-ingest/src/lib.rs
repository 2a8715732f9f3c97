//! timetable-ingest: wire types for the timetable API and their normalization into core types.

pub mod constraints;
pub mod decode;
pub mod error;
pub mod parsers;
pub mod types;

pub use constraints::{ConstraintsEditor, ValidationNotice};
pub use decode::{decode_day, decode_entry, decode_week};
pub use error::{IngestError, Result};
pub use parsers::{
    ServerWorkload, TeacherReport, generate_to_schedule, parse_generate_json, parse_list_json,
    parse_periods_json, parse_teacher_json, parse_workload_json, periods_to_catalog,
    records_to_schedule, teacher_response_to_report,
};
pub use types::{
    Envelope, GenerateData, GenerateResponse, PeriodInfo, RawPeriodConfig, RawPeriodEntry,
    TeacherTimetableResponse, TimetableRecord, WireWorkloadStat,
};

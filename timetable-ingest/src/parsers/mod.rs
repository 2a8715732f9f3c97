pub mod generate;
pub mod periods;
pub mod records;
pub mod teacher;

pub use generate::{generate_to_schedule, parse_generate_json};
pub use periods::{parse_periods_json, periods_to_catalog};
pub use records::{parse_list_json, records_to_schedule};
pub use teacher::{
    ServerWorkload, TeacherReport, parse_teacher_json, parse_workload_json,
    teacher_response_to_report,
};

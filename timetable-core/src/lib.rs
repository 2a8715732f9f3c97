//! timetable-core: period catalog, canonical schedule, view derivation and workload analytics

pub mod day;
pub mod entry;
pub mod export;
pub mod fetch;
pub mod memo;
pub mod palette;
pub mod period;
pub mod schedule;
pub mod time;
pub mod views;
pub mod workload;

pub use day::SchoolDay;
pub use entry::{Cell, PeriodEntry};
pub use export::{ExportFilter, ExportOptions, RecurringEvent, export_events};
pub use fetch::{FetchKey, FetchState, FetchTicket, Liveness, StaleGuard};
pub use memo::{Memo, Snapshot};
pub use palette::{FALLBACK_COLOR, LegendEntry, Palette, SUBJECT_COLORS, subject_color};
pub use period::{PeriodCatalog, PeriodSlot, SlotKind, capitalize_label, default_catalog};
pub use schedule::{CanonicalSchedule, ClassRef, DaySchedule, ScheduleBuilder, StreamWeek};
pub use time::{WallClock, parse_timezone, parse_wall_clock, resolve_local};
pub use views::{
    ClassEntry, Conflict, SchoolCell, SchoolRow, StreamRow, SubjectShare, TeacherCell,
    TeacherLesson, TeacherRow, TeacherView, school_week, school_weekly_view, stream_view,
    stream_weekly_view, subject_distribution, teacher_grid, teacher_view,
};
pub use workload::{
    UtilizationBand, WorkloadConfig, WorkloadStat, WorkloadStatus, WorkloadSummary, compute_all,
    compute_workload, summarize, utilization_percentage,
};

//! A viewing session: the current schedule snapshot, the selectors that
//! produced it, and memoized views over it.
//!
//! Fetch results go through [`ViewSession::apply_schedule`], which drops
//! anything issued under an older selection or after teardown.

use std::sync::Arc;

use anyhow::Result;
use timetable_core::{
    CanonicalSchedule, FetchKey, FetchState, FetchTicket, Liveness, Memo, PeriodCatalog, SchoolDay,
    SchoolRow, Snapshot, StaleGuard, StreamRow, TeacherView, WorkloadConfig, WorkloadStat,
    compute_all, default_catalog, school_weekly_view, stream_view, teacher_view,
};

use crate::api::{ApiClient, TimetableQuery};

pub struct ViewSession {
    grade_order: Vec<String>,
    workload: WorkloadConfig,
    guard: StaleGuard,
    liveness: Liveness,
    state: FetchState<()>,
    snapshot: Snapshot,
    streams: Memo<(String, String, SchoolDay), Vec<StreamRow>>,
    school: Memo<SchoolDay, Vec<SchoolRow>>,
    teachers: Memo<String, TeacherView>,
    workloads: Memo<WorkloadConfig, Vec<WorkloadStat>>,
}

impl ViewSession {
    pub fn new(grade_order: Vec<String>, workload: WorkloadConfig) -> Self {
        Self {
            grade_order,
            workload,
            guard: StaleGuard::new(),
            liveness: Liveness::new(),
            state: FetchState::Idle,
            snapshot: Snapshot::new(CanonicalSchedule::default(), default_catalog()),
            streams: Memo::new(),
            school: Memo::new(),
            teachers: Memo::new(),
            workloads: Memo::new(),
        }
    }

    pub fn grade_order(&self) -> &[String] {
        &self.grade_order
    }

    pub fn state(&self) -> &FetchState<()> {
        &self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Handle for pending fetches; cleared by [`ViewSession::teardown`].
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn teardown(&self) {
        self.liveness.shutdown();
    }

    /// Selectors changed: start a fetch for `key`.
    pub fn select(&mut self, key: FetchKey) -> FetchTicket {
        self.state = FetchState::Loading;
        self.guard.issue(key)
    }

    /// Apply a schedule fetch. Returns false when the result was discarded.
    pub fn apply_schedule(
        &mut self,
        ticket: &FetchTicket,
        result: Result<CanonicalSchedule>,
    ) -> bool {
        if !self.liveness.is_alive() {
            log::debug!("session closed; dropping schedule for {:?}", ticket.key());
            return false;
        }
        let Some(result) = self.guard.accept(ticket, result) else {
            return false;
        };

        match result {
            Ok(schedule) => {
                self.snapshot = self.snapshot.with_schedule(schedule);
                self.state = FetchState::Success(());
            }
            Err(e) => {
                log::warn!("schedule fetch for {:?} failed: {e:#}", ticket.key());
                self.state = FetchState::Error(format!("{e:#}"));
            }
        }
        true
    }

    /// Apply a fetched catalog. Catalogs don't depend on selectors, so only
    /// liveness is checked.
    pub fn apply_catalog(&mut self, catalog: PeriodCatalog) -> bool {
        if !self.liveness.is_alive() {
            return false;
        }
        self.snapshot = self.snapshot.with_catalog(catalog);
        true
    }

    /// Thresholds changed; workload stats recompute on next read.
    pub fn set_workload_config(&mut self, config: WorkloadConfig) -> Result<()> {
        config.validate()?;
        self.workload = config;
        Ok(())
    }

    pub fn workload_config(&self) -> &WorkloadConfig {
        &self.workload
    }

    pub fn stream_view(
        &mut self,
        grade_level: &str,
        stream: &str,
        day: SchoolDay,
    ) -> Arc<Vec<StreamRow>> {
        let key = (grade_level.to_string(), stream.to_string(), day);
        self.streams.get_or_compute(&self.snapshot, &key, |s, c| {
            stream_view(s, c, grade_level, stream, day)
        })
    }

    pub fn school_view(&mut self, day: SchoolDay) -> Arc<Vec<SchoolRow>> {
        self.school
            .get_or_compute(&self.snapshot, &day, |s, c| school_weekly_view(s, c, day))
    }

    pub fn teacher_view(&mut self, teacher_id: &str) -> Arc<TeacherView> {
        let key = teacher_id.to_string();
        self.teachers
            .get_or_compute(&self.snapshot, &key, |s, _| teacher_view(s, teacher_id))
    }

    pub fn workload_stats(&mut self) -> Arc<Vec<WorkloadStat>> {
        let config = self.workload;
        self.workloads
            .get_or_compute(&self.snapshot, &config, |s, _| compute_all(s, &config))
    }

    /// Fetch the catalog and the stored timetables for `query`, applying both
    /// through the guard.
    pub async fn refresh(&mut self, client: &ApiClient, query: &TimetableQuery) -> bool {
        let mut key = FetchKey::default();
        key.academic_year = query.academic_year.clone();
        key.term = query.term.clone();
        key.grade_level = query.grade_level.clone();
        let ticket = self.select(key);

        let catalog = client.period_catalog().await;
        self.apply_catalog(catalog);

        let result = client.schedule(query, &self.grade_order).await;
        self.apply_schedule(&ticket, result)
    }
}

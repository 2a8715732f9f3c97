use anyhow::{Context, Result};
use std::path::PathBuf;
use timetable_client::{ApiClient, TimetableQuery, ViewSession};
use timetable_core::{FetchKey, default_catalog};
use timetable_ingest::{parse_list_json, parse_periods_json, records_to_schedule};

use crate::config::Config;
use crate::state::read_text;

/// Where the schedule and period catalog come from.
#[derive(Debug, Clone, Default)]
pub struct Source {
    /// Saved `GET /timetable/` response; reading it skips the API.
    pub snapshot: Option<PathBuf>,
    /// Saved period configuration response.
    pub periods: Option<PathBuf>,
    pub query: TimetableQuery,
}

impl Source {
    pub fn is_offline(&self) -> bool {
        self.snapshot.is_some()
    }

    /// A session populated from files or the API.
    pub async fn open(&self, cfg: &Config, client: &ApiClient) -> Result<ViewSession> {
        let mut session = ViewSession::new(cfg.school.grade_levels.clone(), cfg.workload);

        if let Some(p) = &self.periods {
            let catalog = parse_periods_json(&read_text(p)?)
                .with_context(|| format!("parse periods from {}", p.display()))?;
            session.apply_catalog(catalog);
        }

        match &self.snapshot {
            Some(p) => {
                if self.periods.is_none() {
                    session.apply_catalog(default_catalog());
                }
                let ticket = session.select(self.fetch_key());
                let result = read_text(p).and_then(|s| {
                    let records = parse_list_json(&s)
                        .with_context(|| format!("parse snapshot {}", p.display()))?;
                    Ok(records_to_schedule(&records, session.grade_order()))
                });
                session.apply_schedule(&ticket, result);
            }
            None => {
                tracing::debug!("loading timetables from {}", client.base_url());
                if self.periods.is_none() {
                    session.refresh(client, &self.query).await;
                } else {
                    let ticket = session.select(self.fetch_key());
                    let result = client.schedule(&self.query, session.grade_order()).await;
                    session.apply_schedule(&ticket, result);
                }
            }
        }

        if let Some(e) = session.state().error() {
            anyhow::bail!("loading timetables failed: {e}");
        }
        Ok(session)
    }

    fn fetch_key(&self) -> FetchKey {
        FetchKey {
            academic_year: self.query.academic_year.clone(),
            term: self.query.term.clone(),
            grade_level: self.query.grade_level.clone(),
            teacher_id: None,
        }
    }
}

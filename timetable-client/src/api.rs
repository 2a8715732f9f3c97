//! HTTP client for the timetable API.
//!
//! Responses are read as text and handed to `timetable_ingest`, which owns all
//! wire decoding.

use anyhow::{Context, Result, bail};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Serialize;
use timetable_core::{CanonicalSchedule, PeriodCatalog, WorkloadConfig, default_catalog};
use timetable_ingest::{
    ServerWorkload, TeacherReport, TimetableRecord, parse_generate_json, parse_list_json,
    parse_periods_json, parse_teacher_json, parse_workload_json, records_to_schedule,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

const NO_QUERY: &[(&str, &str)] = &[];

/// Filters for `GET /timetable/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TimetableQuery {
    pub fn with_academic_year(mut self, year: impl Into<String>) -> Self {
        self.academic_year = Some(year.into());
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn with_grade_level(mut self, grade: impl Into<String>) -> Self {
        self.grade_level = Some(grade.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn read_body(resp: reqwest::Response, what: &str) -> Result<String> {
        let status = resp.status();
        let body = resp.text().await.with_context(|| format!("reading {what} response"))?;
        if !status.is_success() {
            bail!("{what} error: {status} {body}");
        }
        Ok(body)
    }

    async fn get_text<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<String> {
        log::debug!("GET {}", self.url(path));
        let resp = self
            .http
            .get(self.url(path))
            .headers(Self::headers())
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {path}"))?;
        Self::read_body(resp, path).await
    }

    /// The configured period catalog. Errors are returned as-is.
    pub async fn try_period_catalog(&self) -> Result<PeriodCatalog> {
        let body = self
            .get_text("timeslots/configurations/periods", NO_QUERY)
            .await?;
        parse_periods_json(&body).context("parse period configuration")
    }

    /// The configured period catalog, or the default one if it can't be loaded.
    pub async fn period_catalog(&self) -> PeriodCatalog {
        catalog_or_default(self.try_period_catalog().await)
    }

    pub async fn timetables(&self, query: &TimetableQuery) -> Result<Vec<TimetableRecord>> {
        let body = self.get_text("timetable/", query).await?;
        parse_list_json(&body).context("parse timetable list")
    }

    /// Stored timetables matching `query`, merged into one schedule.
    pub async fn schedule(
        &self,
        query: &TimetableQuery,
        grade_order: &[String],
    ) -> Result<CanonicalSchedule> {
        let records = self.timetables(query).await?;
        Ok(records_to_schedule(&records, grade_order))
    }

    /// Ask the generator for a grade level's timetable.
    pub async fn generate(
        &self,
        grade_level: &str,
        query: &TimetableQuery,
        grade_order: &[String],
    ) -> Result<CanonicalSchedule> {
        let path = format!("timetable/generate/{grade_level}");
        log::info!("requesting timetable generation for {grade_level}");
        let resp = self
            .http
            .post(self.url(&path))
            .headers(Self::headers())
            .json(&serde_json::json!({
                "academicYear": query.academic_year,
                "term": query.term,
            }))
            .send()
            .await
            .with_context(|| format!("POST {path}"))?;
        let body = Self::read_body(resp, &path).await?;
        parse_generate_json(&body, grade_level, grade_order)
            .with_context(|| format!("parse generated timetable for {grade_level}"))
    }

    pub async fn teacher_timetable(
        &self,
        teacher_id: &str,
        query: &TimetableQuery,
        grade_order: &[String],
        config: &WorkloadConfig,
    ) -> Result<TeacherReport> {
        let path = format!("timetable/teacher/{teacher_id}");
        let body = self.get_text(&path, query).await?;
        parse_teacher_json(&body, teacher_id, grade_order, config)
            .with_context(|| format!("parse timetable for teacher {teacher_id}"))
    }

    pub async fn workload(&self, config: &WorkloadConfig) -> Result<Vec<ServerWorkload>> {
        let body = self.get_text("timetable/teacher/workload", NO_QUERY).await?;
        parse_workload_json(&body, config).context("parse workload stats")
    }
}

/// The fetched catalog, or the default one with a warning.
pub fn catalog_or_default(fetched: Result<PeriodCatalog>) -> PeriodCatalog {
    match fetched {
        Ok(c) => c,
        Err(e) => {
            log::warn!("period configuration unavailable ({e:#}); using the default catalog");
            default_catalog()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_catalog_fetch_uses_default() {
        let c = catalog_or_default(Err(anyhow::anyhow!("connection refused")));
        assert_eq!(c.len(), 12);
        let first = c.get(0).unwrap();
        assert_eq!(first.start.as_str(), "7:00");
        assert_eq!(first.end.as_str(), "7:05");
        assert_eq!(first.label, "Registration");
    }

    #[test]
    fn test_url_joining() {
        let c = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(c.url("/timetable/"), "http://localhost:5000/api/timetable/");
        assert_eq!(c.base_url(), "http://localhost:5000/api");
    }
}

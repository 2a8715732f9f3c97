use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use timetable_core::{ExportOptions, WorkloadConfig, parse_timezone};

use crate::state::ensure_timetable_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub school: SchoolSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub academic_year: Option<String>,
    pub term: Option<String>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: timetable_client::DEFAULT_BASE_URL.to_string(),
            academic_year: None,
            term: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolSection {
    /// Canonical grade order for every multi-class view.
    pub grade_levels: Vec<String>,
    /// IANA name; period times are wall-clock times in this zone.
    pub timezone: String,
    pub term_start: Option<NaiveDate>,
    pub term_end: Option<NaiveDate>,
}

impl Default for SchoolSection {
    fn default() -> Self {
        Self {
            grade_levels: ["Form 1", "Form 2", "Form 3", "Form 4"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timezone: "Africa/Harare".to_string(),
            term_start: None,
            term_end: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.workload.validate().context("[workload]")?;
        parse_timezone(&self.school.timezone).context("[school] timezone")?;
        if let (Some(start), Some(end)) = (self.school.term_start, self.school.term_end) {
            if end < start {
                bail!("[school] term_end {end} is before term_start {start}");
            }
        }
        Ok(())
    }

    /// Export settings; both term dates must be configured or given.
    pub fn export_options(
        &self,
        term_start: Option<NaiveDate>,
        term_end: Option<NaiveDate>,
    ) -> Result<ExportOptions> {
        let term_start = term_start
            .or(self.school.term_start)
            .context("term start not set; pass --term-start or set [school] term_start")?;
        let term_end = term_end
            .or(self.school.term_end)
            .context("term end not set; pass --term-end or set [school] term_end")?;
        if term_end < term_start {
            bail!("term end {term_end} is before term start {term_start}");
        }
        Ok(ExportOptions {
            term_start,
            term_end,
            timezone: parse_timezone(&self.school.timezone)?,
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_timetable_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("in {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(cfg: &Config) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.workload, WorkloadConfig::new(15, 25, 24));
        assert_eq!(cfg.school.grade_levels[0], "Form 1");
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[api]
base_url = "https://school.example/api"
academic_year = "2026"

[workload]
target_workload = 20

[school]
term_start = "2026-01-13"
term_end = "2026-04-09"
"#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "https://school.example/api");
        assert_eq!(cfg.api.term, None);
        assert_eq!(cfg.workload.min_workload, 15);
        assert_eq!(cfg.workload.target_workload, 20);
        assert_eq!(cfg.school.timezone, "Africa/Harare");

        let opts = cfg.export_options(None, None).unwrap();
        assert_eq!(opts.term_end, NaiveDate::from_ymd_opt(2026, 4, 9).unwrap());
    }

    #[test]
    fn test_invalid_workload_rejected() {
        let err = parse_config("[workload]\nmin_workload = 30\nmax_workload = 25\n").unwrap_err();
        assert!(format!("{err:#}").contains("min_workload"));
    }

    #[test]
    fn test_bad_timezone_rejected() {
        assert!(parse_config("[school]\ntimezone = \"Mars/Olympus\"\n").is_err());
    }

    #[test]
    fn test_export_needs_term_dates() {
        assert!(Config::default().export_options(None, None).is_err());
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }
}

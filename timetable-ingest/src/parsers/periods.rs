//! `GET /timeslots/configurations/periods`: `{ "<index>": { start, end, type } }`.
//!
//! Order comes from a numeric sort of the keys, not from the JSON object order.

use std::collections::BTreeMap;

use timetable_core::{PeriodCatalog, PeriodSlot, SlotKind, capitalize_label, parse_wall_clock};

use crate::error::{IngestError, Result};
use crate::types::RawPeriodConfig;

pub fn parse_periods_json(json: &str) -> Result<PeriodCatalog> {
    let raw: BTreeMap<String, RawPeriodConfig> = serde_json::from_str(json)?;
    periods_to_catalog(&raw)
}

pub fn periods_to_catalog(raw: &BTreeMap<String, RawPeriodConfig>) -> Result<PeriodCatalog> {
    let mut keyed: Vec<(u32, &RawPeriodConfig)> = Vec::with_capacity(raw.len());
    for (key, cfg) in raw {
        match key.trim().parse::<u32>() {
            Ok(n) => keyed.push((n, cfg)),
            Err(_) => log::warn!("period config key {key:?} is not numeric; skipped"),
        }
    }
    keyed.sort_by_key(|(n, _)| *n);

    let mut slots = Vec::with_capacity(keyed.len());
    for (n, cfg) in keyed {
        let start = parse_wall_clock(&cfg.start)
            .map_err(|e| IngestError::InvalidTime(format!("period {n} start: {e}")))?;
        let end = parse_wall_clock(&cfg.end)
            .map_err(|e| IngestError::InvalidTime(format!("period {n} end: {e}")))?;

        let kind_text = cfg.kind.as_deref().unwrap_or("lesson");
        let label = match &cfg.label {
            Some(l) if !l.trim().is_empty() => l.clone(),
            _ => capitalize_label(kind_text),
        };
        slots.push(PeriodSlot::new(start, end, label).with_kind(SlotKind::classify(kind_text)));
    }

    if slots.is_empty() {
        return Err(IngestError::Unsuccessful("no periods configured".to_string()));
    }
    Ok(PeriodCatalog::new(slots))
}

//! Time utilities: wall-clock period times and timezone-aware resolution.
//!
//! Period times are kept exactly as configured ("7:05", "13:00") so every view
//! shows the same strings. They only become instants when resolved against an
//! explicit school timezone.

use std::cmp::Ordering;
use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A time of day as written in the period configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallClock {
    raw: String,
    seconds: u32,
}

impl WallClock {
    /// Build from hour and minute; the raw form is `H:MM` (no hour padding).
    pub fn hm(hour: u32, minute: u32) -> Self {
        let hour = hour % 24;
        let minute = minute % 60;
        Self {
            raw: format!("{}:{:02}", hour, minute),
            seconds: hour * 3600 + minute * 60,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn seconds_from_midnight(&self) -> u32 {
        self.seconds
    }

    pub fn naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_num_seconds_from_midnight_opt(self.seconds, 0)
    }
}

impl Ord for WallClock {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds
            .cmp(&other.seconds)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for WallClock {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for WallClock {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        parse_wall_clock(&value)
    }
}

impl From<WallClock> for String {
    fn from(value: WallClock) -> Self {
        value.raw
    }
}

/// Parse `H:MM`, `HH:MM` or `HH:MM:SS`, keeping the trimmed input verbatim.
pub fn parse_wall_clock(s: &str) -> Result<WallClock> {
    let re = Regex::new(r"^(?P<h>\d{1,2}):(?P<m>\d{2})(?::(?P<s>\d{2}))?$")?;
    let trimmed = s.trim();
    let caps = re
        .captures(trimmed)
        .ok_or_else(|| anyhow!("invalid wall-clock time '{s}'"))?;

    let h: u32 = caps["h"].parse()?;
    let m: u32 = caps["m"].parse()?;
    let sec: u32 = match caps.name("s") {
        Some(v) => v.as_str().parse()?,
        None => 0,
    };

    if h > 23 || m > 59 || sec > 59 {
        return Err(anyhow!("wall-clock time out of range '{s}'"));
    }

    Ok(WallClock {
        raw: trimmed.to_string(),
        seconds: h * 3600 + m * 60 + sec,
    })
}

/// Parse an IANA timezone name like "Africa/Harare".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse().map_err(|_| anyhow!("invalid timezone: {tz}"))
}

/// Resolve a wall-clock time on a given date in `tz`, returning UTC.
pub fn resolve_local(date: NaiveDate, wall: &WallClock, tz: Tz) -> Result<DateTime<Utc>> {
    let time = wall
        .naive_time()
        .ok_or_else(|| anyhow!("invalid wall-clock time '{wall}'"))?;
    let ndt = date.and_time(time);

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow!("ambiguous or invalid local time (DST?): {ndt} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

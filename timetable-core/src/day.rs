//! School days. The week is Monday..Friday and that order is the only order
//! any view iterates in.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
        }
    }

    /// Accepts full names and three-letter abbreviations, any case.
    pub fn parse(s: &str) -> Option<SchoolDay> {
        let l = s.trim().to_lowercase();
        let day = match l.as_str() {
            "monday" | "mon" => SchoolDay::Monday,
            "tuesday" | "tue" | "tues" => SchoolDay::Tuesday,
            "wednesday" | "wed" => SchoolDay::Wednesday,
            "thursday" | "thu" | "thur" | "thurs" => SchoolDay::Thursday,
            "friday" | "fri" => SchoolDay::Friday,
            _ => return None,
        };
        Some(day)
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            SchoolDay::Monday => Weekday::Mon,
            SchoolDay::Tuesday => Weekday::Tue,
            SchoolDay::Wednesday => Weekday::Wed,
            SchoolDay::Thursday => Weekday::Thu,
            SchoolDay::Friday => Weekday::Fri,
        }
    }

    /// RFC 5545 BYDAY code.
    pub fn ics_code(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "MO",
            SchoolDay::Tuesday => "TU",
            SchoolDay::Wednesday => "WE",
            SchoolDay::Thursday => "TH",
            SchoolDay::Friday => "FR",
        }
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

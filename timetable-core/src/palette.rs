//! Subject color mapping and legend.
//!
//! One ordered table for every consumer. A subject takes the color of the
//! first key that is a substring of its name; anything else gets
//! [`FALLBACK_COLOR`].

use serde::{Deserialize, Serialize};

pub const FALLBACK_COLOR: &str = "gray";

pub const SUBJECT_COLORS: &[(&str, &str)] = &[
    ("Mathematics", "blue"),
    ("Physics", "teal"),
    ("Chemistry", "cyan"),
    ("Biology", "green"),
    ("History", "orange"),
    ("Geography", "indigo"),
    ("English", "violet"),
    ("Kiswahili", "grape"),
    ("Computer Studies", "pink"),
    ("Business Studies", "yellow"),
    ("Agriculture", "lime"),
    ("Home Science", "red"),
    ("Shona Language", "orange"),
    ("Ndebele Language", "indigo"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub subject: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<(String, String)>,
    fallback: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

impl Palette {
    pub fn standard() -> Self {
        Self::new(
            SUBJECT_COLORS
                .iter()
                .map(|(k, c)| (k.to_string(), c.to_string()))
                .collect(),
            FALLBACK_COLOR,
        )
    }

    pub fn new(entries: Vec<(String, String)>, fallback: impl Into<String>) -> Self {
        Self {
            entries,
            fallback: fallback.into(),
        }
    }

    pub fn resolve(&self, subject: &str) -> &str {
        let table = self.entries.iter().map(|(k, c)| (k.as_str(), c.as_str()));
        first_match(table, subject).unwrap_or(&self.fallback)
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.entries
            .iter()
            .map(|(subject, color)| LegendEntry {
                subject: subject.clone(),
                color: color.clone(),
            })
            .collect()
    }
}

/// Color of the first key contained in `subject`.
fn first_match<'a>(
    table: impl IntoIterator<Item = (&'a str, &'a str)>,
    subject: &str,
) -> Option<&'a str> {
    table
        .into_iter()
        .find(|(key, _)| subject.contains(key))
        .map(|(_, color)| color)
}

/// Color of `subject` under the standard table.
pub fn subject_color(subject: &str) -> &'static str {
    first_match(SUBJECT_COLORS.iter().copied(), subject).unwrap_or(FALLBACK_COLOR)
}

//! Normalized period entries and the cells views render them as.
//!
//! Every wire shape is decoded into [`PeriodEntry`] once, at ingestion. Nothing
//! downstream looks at raw JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::period::capitalize_label;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PeriodEntry {
    Break,
    Lesson {
        subject: String,
        teacher_id: String,
    },
    Other {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl PeriodEntry {
    pub fn lesson(subject: impl Into<String>, teacher_id: impl Into<String>) -> Self {
        PeriodEntry::Lesson {
            subject: subject.into(),
            teacher_id: teacher_id.into(),
        }
    }

    pub fn other(kind: impl Into<String>, name: Option<String>) -> Self {
        PeriodEntry::Other {
            kind: kind.into(),
            name,
        }
    }

    pub fn is_lesson(&self) -> bool {
        matches!(self, PeriodEntry::Lesson { .. })
    }

    /// (subject, teacher_id) for lessons.
    pub fn as_lesson(&self) -> Option<(&str, &str)> {
        match self {
            PeriodEntry::Lesson {
                subject,
                teacher_id,
            } => Some((subject, teacher_id)),
            _ => None,
        }
    }

    /// The `Break` sentinel, or any `Other` whose type mentions "break".
    pub fn is_break_like(&self) -> bool {
        match self {
            PeriodEntry::Break => true,
            PeriodEntry::Other { kind, .. } => kind.to_lowercase().contains("break"),
            PeriodEntry::Lesson { .. } => false,
        }
    }

    pub fn render(&self) -> Cell {
        match self {
            PeriodEntry::Break => Cell::Break { name: None },
            PeriodEntry::Other { name, .. } if self.is_break_like() => Cell::Break {
                name: name.clone(),
            },
            PeriodEntry::Lesson {
                subject,
                teacher_id,
            } => Cell::Lesson {
                subject: subject.clone(),
                teacher_id: teacher_id.clone(),
            },
            PeriodEntry::Other { kind, name } => Cell::Activity {
                label: match name {
                    Some(n) if !n.trim().is_empty() => n.clone(),
                    _ => capitalize_label(kind),
                },
            },
        }
    }
}

/// What a view shows in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Cell {
    Free,
    Break {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Lesson {
        subject: String,
        teacher_id: String,
    },
    Activity {
        label: String,
    },
}

impl Cell {
    pub fn from_entry(entry: Option<&PeriodEntry>) -> Cell {
        entry.map(PeriodEntry::render).unwrap_or(Cell::Free)
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Cell::Free)
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            Cell::Lesson { subject, .. } => Some(subject),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Free => f.write_str("Free"),
            Cell::Break { name: Some(n) } => write!(f, "Break ({n})"),
            Cell::Break { name: None } => f.write_str("Break"),
            Cell::Lesson {
                subject,
                teacher_id,
            } => write!(f, "{subject}/{teacher_id}"),
            Cell::Activity { label } => f.write_str(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_like_other_renders_as_break_with_name() {
        let e = PeriodEntry::other("break", Some("Lunch Break".to_string()));
        assert_eq!(
            e.render(),
            Cell::Break {
                name: Some("Lunch Break".to_string())
            }
        );
        assert_eq!(e.render().to_string(), "Break (Lunch Break)");
    }

    #[test]
    fn test_other_uses_name_then_type() {
        let named = PeriodEntry::other("assembly", Some("Friday Assembly".to_string()));
        assert_eq!(named.render().to_string(), "Friday Assembly");

        let bare = PeriodEntry::other("registration", None);
        assert_eq!(bare.render().to_string(), "Registration");
    }

    #[test]
    fn test_lesson_cell() {
        let e = PeriodEntry::lesson("Mathematics", "T001");
        assert_eq!(e.as_lesson(), Some(("Mathematics", "T001")));
        assert_eq!(e.render().to_string(), "Mathematics/T001");
        assert_eq!(Cell::from_entry(None), Cell::Free);
    }
}

//! Period catalog: the ordered list of daily time slots.
//!
//! Slot `i` of the catalog pairs with entry `i` of every day schedule, so the
//! catalog is positional. It comes from the period configuration endpoint; when
//! that is unavailable the fixed [`default_catalog`] is used so the layout never
//! changes between sessions.

use serde::{Deserialize, Serialize};

use crate::time::WallClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Lesson,
    Break,
    Registration,
    Assembly,
    Extracurricular,
    Practical,
}

impl SlotKind {
    /// Classify a configured slot type or label ("Lunch Break Time", "lesson",
    /// "Sporting/Clubs/Extracurricular").
    pub fn classify(text: &str) -> SlotKind {
        let t = text.to_lowercase();
        if t.contains("break") {
            SlotKind::Break
        } else if t.contains("registration") {
            SlotKind::Registration
        } else if t.contains("assembly") {
            SlotKind::Assembly
        } else if t.contains("extracurricular") || t.contains("sporting") || t.contains("club") {
            SlotKind::Extracurricular
        } else if t.contains("practical") {
            SlotKind::Practical
        } else {
            SlotKind::Lesson
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodSlot {
    pub index: usize,
    pub start: WallClock,
    pub end: WallClock,
    pub kind: SlotKind,
    pub label: String,
}

impl PeriodSlot {
    pub fn new(start: WallClock, end: WallClock, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            index: 0,
            kind: SlotKind::classify(&label),
            start,
            end,
            label,
        }
    }

    pub fn with_kind(mut self, kind: SlotKind) -> Self {
        self.kind = kind;
        self
    }

    /// A slot is a break when its label contains "break", any case.
    /// Renamed break slots must keep that substring.
    pub fn is_break(&self) -> bool {
        self.label.to_lowercase().contains("break")
    }

    /// Slots no teacher is timetabled into: breaks, registration, assembly
    /// and the afternoon extracurricular block.
    pub fn is_non_teaching(&self) -> bool {
        self.is_break()
            || matches!(
                self.kind,
                SlotKind::Registration | SlotKind::Assembly | SlotKind::Extracurricular
            )
    }

    /// "7:05 - 7:40"
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start, self.end)
    }

    /// Half-open: `start <= t < end`.
    pub fn contains(&self, t: &WallClock) -> bool {
        self.start.seconds_from_midnight() <= t.seconds_from_midnight()
            && t.seconds_from_midnight() < self.end.seconds_from_midnight()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodCatalog {
    slots: Vec<PeriodSlot>,
}

impl PeriodCatalog {
    /// Slots are re-indexed by position.
    pub fn new(slots: Vec<PeriodSlot>) -> Self {
        let slots = slots
            .into_iter()
            .enumerate()
            .map(|(i, mut s)| {
                s.index = i;
                s
            })
            .collect();
        Self { slots }
    }

    pub fn with_slot(mut self, start: WallClock, end: WallClock, label: &str) -> Self {
        let mut slot = PeriodSlot::new(start, end, label);
        slot.index = self.slots.len();
        self.slots.push(slot);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PeriodSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[PeriodSlot] {
        &self.slots
    }

    /// The slot in progress at `t`, if any.
    pub fn slot_at(&self, t: &WallClock) -> Option<&PeriodSlot> {
        self.slots.iter().find(|s| s.contains(t))
    }

    /// Slots a lesson can occupy on one day.
    pub fn teaching_slot_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_non_teaching()).count()
    }
}

/// The fixed school day used whenever the period configuration can't be loaded.
pub fn default_catalog() -> PeriodCatalog {
    PeriodCatalog::default()
        .with_slot(WallClock::hm(7, 0), WallClock::hm(7, 5), "Registration")
        .with_slot(WallClock::hm(7, 5), WallClock::hm(7, 40), "Lesson")
        .with_slot(WallClock::hm(7, 40), WallClock::hm(8, 15), "Lesson")
        .with_slot(WallClock::hm(8, 15), WallClock::hm(8, 50), "Lesson")
        .with_slot(WallClock::hm(8, 50), WallClock::hm(9, 25), "Lesson")
        .with_slot(WallClock::hm(9, 25), WallClock::hm(9, 40), "Morning Break Time")
        .with_slot(WallClock::hm(9, 40), WallClock::hm(10, 15), "Lesson")
        .with_slot(WallClock::hm(10, 15), WallClock::hm(10, 50), "Lesson")
        .with_slot(WallClock::hm(10, 50), WallClock::hm(11, 25), "Lesson")
        .with_slot(WallClock::hm(11, 25), WallClock::hm(12, 0), "Lesson")
        .with_slot(WallClock::hm(12, 0), WallClock::hm(13, 0), "Lunch Break Time")
        .with_slot(
            WallClock::hm(13, 0),
            WallClock::hm(16, 0),
            "Sporting/Clubs/Extracurricular",
        )
}

/// "lesson" -> "Lesson". Config slots carry only a type; this is their label.
pub fn capitalize_label(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

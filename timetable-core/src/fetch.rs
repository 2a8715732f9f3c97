//! Fetch lifecycle and the stale-response guard.
//!
//! Every fetch is issued against the selector values active at the time
//! ([`FetchKey`]). The guard hands out a [`FetchTicket`]; a response is applied
//! only if its ticket is still the newest one and the session is still alive.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn from_result<E: std::fmt::Display>(r: Result<T, E>) -> Self {
        match r {
            Ok(v) => FetchState::Success(v),
            Err(e) => FetchState::Error(e.to_string()),
        }
    }
}

/// Selector values a fetch depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub academic_year: Option<String>,
    pub term: Option<String>,
    pub grade_level: Option<String>,
    pub teacher_id: Option<String>,
}

impl FetchKey {
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

    pub fn with_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = Some(teacher_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    key: FetchKey,
}

impl FetchTicket {
    pub fn key(&self) -> &FetchKey {
        &self.key
    }
}

#[derive(Debug, Default)]
pub struct StaleGuard {
    generation: u64,
    active: Option<FetchKey>,
}

impl StaleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selector change and return the ticket for the fetch it triggers.
    /// Any earlier ticket becomes stale.
    pub fn issue(&mut self, key: FetchKey) -> FetchTicket {
        self.generation += 1;
        self.active = Some(key.clone());
        FetchTicket {
            generation: self.generation,
            key,
        }
    }

    pub fn active(&self) -> Option<&FetchKey> {
        self.active.as_ref()
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && self.active.as_ref() == Some(&ticket.key)
    }

    /// `Some(value)` if `ticket` is current, otherwise drop it.
    pub fn accept<T>(&self, ticket: &FetchTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            log::debug!(
                "discarding stale response for {:?} (generation {} < {})",
                ticket.key,
                ticket.generation,
                self.generation
            );
            None
        }
    }
}

/// Cleared when a session is torn down; pending fetches check it before
/// applying anything.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn shutdown(&self) {
        self.0.store(false, Ordering::Release);
    }
}

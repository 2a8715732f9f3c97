//! timetable-client: async API client and view sessions with stale-response protection

pub mod api;
pub mod session;

pub use api::{ApiClient, DEFAULT_BASE_URL, TimetableQuery, catalog_or_default};
pub use session::ViewSession;

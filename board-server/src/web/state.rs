//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::holidays::HolidayCalendar;
use crate::line::LineConfig;
use crate::lookup::{DayType, LookupConfig};
use crate::session::SessionStore;
use crate::timetable::Timetable;

/// Why a timetable is not available right now.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotReady {
    /// The startup load has not finished yet.
    #[error("timetable still loading")]
    Loading,

    /// The startup load failed; there is no retry.
    #[error("timetable load failed: {0}")]
    Failed(String),
}

/// Both service-day timetables.
#[derive(Clone)]
pub struct Tables {
    pub weekday: Arc<Timetable>,
    pub holiday: Arc<Timetable>,
}

enum LoadState {
    Loading,
    Ready(Tables),
    Failed(String),
}

/// Readiness gate over the loaded timetables.
///
/// Starts in the loading state; the startup task resolves it exactly
/// once, to ready or failed. A failed load is permanent — queries keep
/// answering with the failure until restart.
#[derive(Clone)]
pub struct TimetableStore {
    inner: Arc<RwLock<LoadState>>,
}

impl TimetableStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LoadState::Loading)),
        }
    }

    /// Resolve the gate with both loaded tables.
    pub async fn set_ready(&self, weekday: Timetable, holiday: Timetable) {
        let mut guard = self.inner.write().await;
        *guard = LoadState::Ready(Tables {
            weekday: Arc::new(weekday),
            holiday: Arc::new(holiday),
        });
    }

    /// Resolve the gate with a permanent failure.
    pub async fn set_failed(&self, message: impl Into<String>) {
        let mut guard = self.inner.write().await;
        *guard = LoadState::Failed(message.into());
    }

    /// The timetable for a service-day kind, if the gate is resolved.
    pub async fn table_for(&self, day: DayType) -> Result<Arc<Timetable>, NotReady> {
        let guard = self.inner.read().await;
        match &*guard {
            LoadState::Loading => Err(NotReady::Loading),
            LoadState::Failed(message) => Err(NotReady::Failed(message.clone())),
            LoadState::Ready(tables) => Ok(match day {
                DayType::Weekday => tables.weekday.clone(),
                DayType::Holiday => tables.holiday.clone(),
            }),
        }
    }
}

impl Default for TimetableStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Line topology and schedule constants.
    pub line: Arc<LineConfig>,

    /// Loaded timetables behind the readiness gate.
    pub tables: TimetableStore,

    /// National holiday calendar.
    pub holidays: Arc<HolidayCalendar>,

    /// Last-selected-station persistence.
    pub session: Arc<SessionStore>,

    /// Lookup parameters.
    pub lookup: Arc<LookupConfig>,
}

impl AppState {
    pub fn new(
        line: LineConfig,
        tables: TimetableStore,
        holidays: HolidayCalendar,
        session: SessionStore,
        lookup: LookupConfig,
    ) -> Self {
        Self {
            line: Arc::new(line),
            tables,
            holidays: Arc::new(holidays),
            session: Arc::new(session),
            lookup: Arc::new(lookup),
        }
    }
}

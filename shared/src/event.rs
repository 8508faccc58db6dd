use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::model::{ReportId, ReportsPage};
use crate::saved_reports::FetchTicket;
use crate::AppError;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // --- Lifecycle ---
    /// The saved-reports screen was mounted; triggers the first page load.
    Mounted { api: ApiConfig },
    /// The screen was torn down; list state is discarded.
    Unmounted,

    // --- User actions ---
    Refresh,
    /// Retry button on the error screen.
    Retry,
    LoadMore,
    /// Swipe action pressed; asks for confirmation first.
    DeleteRequested { id: ReportId },
    DeleteConfirmed,
    DeleteCancelled,
    AlertDismissed,
    ReportOpened { id: ReportId },

    // --- Capability responses ---
    #[serde(skip)]
    ReportsFetched {
        ticket: FetchTicket,
        outcome: Result<ReportsPage, AppError>,
    },
    #[serde(skip)]
    DeleteFinished {
        id: ReportId,
        outcome: Result<(), AppError>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mounted { .. } => "mounted",
            Self::Unmounted => "unmounted",
            Self::Refresh => "refresh",
            Self::Retry => "retry",
            Self::LoadMore => "load_more",
            Self::DeleteRequested { .. } => "delete_requested",
            Self::DeleteConfirmed => "delete_confirmed",
            Self::DeleteCancelled => "delete_cancelled",
            Self::AlertDismissed => "alert_dismissed",
            Self::ReportOpened { .. } => "report_opened",
            Self::ReportsFetched { .. } => "reports_fetched",
            Self::DeleteFinished { .. } => "delete_finished",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::Refresh
                | Self::Retry
                | Self::LoadMore
                | Self::DeleteRequested { .. }
                | Self::DeleteConfirmed
                | Self::DeleteCancelled
                | Self::AlertDismissed
                | Self::ReportOpened { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name() {
        assert_eq!(Event::Refresh.name(), "refresh");
        assert_eq!(
            Event::DeleteRequested { id: ReportId::new("r") }.name(),
            "delete_requested"
        );
        assert_eq!(
            Event::DeleteFinished { id: ReportId::new("r"), outcome: Ok(()) }.name(),
            "delete_finished"
        );
    }

    #[test]
    fn test_event_is_user_initiated() {
        assert!(Event::LoadMore.is_user_initiated());
        assert!(Event::DeleteConfirmed.is_user_initiated());
        assert!(!Event::Unmounted.is_user_initiated());
        assert!(!Event::ReportsFetched {
            ticket: FetchTicket(1),
            outcome: Ok(ReportsPage::default()),
        }
        .is_user_initiated());
    }

    #[test]
    fn test_shell_events_serialize() {
        let json = serde_json::to_string(&Event::ReportOpened { id: ReportId::new("r-1") }).unwrap();
        assert_eq!(json, r#"{"ReportOpened":{"id":"r-1"}}"#);
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Event::ReportOpened { id: ReportId::new("r-1") });
    }
}

//! Saved-reports list controller.
//!
//! Owns the paginated list of report summaries and every transition on it:
//! page loads, refresh, infinite scroll and optimistic delete with rollback.
//! The controller never performs I/O. Each operation mutates local state and
//! returns the [`Command`]s the app must execute; results come back through
//! [`SavedReports::page_fetched`] and [`SavedReports::delete_finished`].
//!
//! List requests are tagged with a [`FetchTicket`]. A replacing load
//! supersedes everything issued before it, so an older response arriving late
//! can never clobber newer state.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::{ReportId, ReportSummary, ReportsPage};
use crate::{AppError, BACKFILL_LIMIT, PAGE_SIZE};

pub const DELETE_CONFIRM_TITLE: &str = "Delete report";
pub const DELETE_CONFIRM_MESSAGE: &str =
    "Are you sure you want to delete this saved report? This action cannot be undone.";
pub const DELETE_FAILED_TITLE: &str = "Delete failed";
pub const DELETE_FAILED_FALLBACK: &str = "Unable to delete the report.";

/// Sequence number of a list request. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FetchTicket(pub u64);

/// Work the app must carry out on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `GET /saved-reports?limit=..&offset=..`; answer with `page_fetched(ticket, ..)`.
    List {
        ticket: FetchTicket,
        offset: usize,
        limit: usize,
    },
    /// `DELETE /saved-reports/{id}`; answer with `delete_finished(id, ..)`.
    Delete { id: ReportId },
    OpenReport { id: ReportId },
}

/// One-shot message for the user, dismissed explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn delete_failed(error: &AppError) -> Self {
        let message = error.user_facing_message();
        Self {
            title: DELETE_FAILED_TITLE.to_string(),
            message: if message.trim().is_empty() {
                DELETE_FAILED_FALLBACK.to_string()
            } else {
                message
            },
        }
    }
}

/// Read-only snapshot of the list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListState {
    pub items: Vec<ReportSummary>,
    pub total: u64,
    pub has_more: bool,
    pub offset: usize,
    pub loading: bool,
    pub loading_more: bool,
    pub refreshing: bool,
    pub deleting_id: Option<ReportId>,
    pub error: Option<AppError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    offset: usize,
    limit: usize,
    append: bool,
    refresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeletePhase {
    /// Removed locally; the server has not answered yet.
    Tentative,
    /// Server answered; waiting on the load that reconciles the list.
    Reconciling { ticket: FetchTicket, committed: bool },
}

#[derive(Debug, Clone)]
struct PendingDelete {
    id: ReportId,
    pre_delete_count: usize,
    /// Position and value of the removed row, kept for rollback.
    removed: Option<(usize, ReportSummary)>,
    total_decremented: bool,
    phase: DeletePhase,
}

#[derive(Debug, Default)]
pub struct SavedReports {
    items: Vec<ReportSummary>,
    total: u64,
    has_more: bool,
    error: Option<AppError>,

    in_flight: BTreeMap<FetchTicket, InFlight>,
    last_ticket: u64,
    latest_replace: Option<FetchTicket>,

    deleting: Option<PendingDelete>,
    confirmation: Option<ReportId>,
    alert: Option<Alert>,
}

impl SavedReports {
    // --- Accessors ---

    #[must_use]
    pub fn items(&self) -> &[ReportSummary] {
        &self.items
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Offset of the next page.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.values().any(|f| !f.append)
    }

    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.in_flight.values().any(|f| f.append)
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.values().any(|f| f.refresh)
    }

    #[must_use]
    pub fn deleting_id(&self) -> Option<&ReportId> {
        self.deleting.as_ref().map(|d| &d.id)
    }

    #[must_use]
    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn pending_confirmation(&self) -> Option<&ReportId> {
        self.confirmation.as_ref()
    }

    #[must_use]
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> ListState {
        ListState {
            items: self.items.clone(),
            total: self.total,
            has_more: self.has_more,
            offset: self.offset(),
            loading: self.is_loading(),
            loading_more: self.is_loading_more(),
            refreshing: self.is_refreshing(),
            deleting_id: self.deleting_id().cloned(),
            error: self.error.clone(),
        }
    }

    // --- Loading ---

    /// Fetches `limit` reports starting at `offset`, merging into the list
    /// when `append` is set and replacing it otherwise.
    pub fn load(&mut self, offset: usize, limit: usize, append: bool) -> Vec<Command> {
        self.load_inner(offset, limit, append, false)
            .map(|(_, cmd)| vec![cmd])
            .unwrap_or_default()
    }

    pub fn refresh(&mut self) -> Vec<Command> {
        self.load_inner(0, PAGE_SIZE, false, true)
            .map(|(_, cmd)| vec![cmd])
            .unwrap_or_default()
    }

    /// Next page for infinite scroll. Ignored while a page is already
    /// loading, while a replacing load is pending, or at the end of the list.
    pub fn load_more(&mut self) -> Vec<Command> {
        if self.is_loading_more() || !self.has_more {
            debug!(
                loading_more = self.is_loading_more(),
                has_more = self.has_more,
                "load more ignored"
            );
            return Vec::new();
        }
        if self.is_loading() {
            debug!("load more ignored while the list is being replaced");
            return Vec::new();
        }
        self.load(self.items.len(), PAGE_SIZE, true)
    }

    /// Applies the outcome of the list request tagged `ticket`.
    pub fn page_fetched(&mut self, ticket: FetchTicket, outcome: Result<ReportsPage, AppError>) {
        let Some(request) = self.in_flight.remove(&ticket) else {
            warn!(ticket = ticket.0, "response for unknown list request dropped");
            return;
        };

        let superseded = self.latest_replace.is_some_and(|latest| ticket < latest);
        if superseded {
            debug!(
                ticket = ticket.0,
                offset = request.offset,
                limit = request.limit,
                "stale list response discarded"
            );
        } else {
            match outcome {
                Ok(page) => {
                    debug!(
                        ticket = ticket.0,
                        received = page.reports.len(),
                        total = page.total,
                        has_more = page.has_more,
                        append = request.append,
                        "saved reports page applied"
                    );
                    self.apply_page(page, request);
                }
                Err(error) => {
                    warn!(ticket = ticket.0, %error, "loading saved reports failed");
                    self.error = Some(error);
                }
            }
        }

        if let Some(pending) = &self.deleting {
            if let DeletePhase::Reconciling { ticket: t, committed } = pending.phase {
                if t == ticket {
                    info!(report_id = %pending.id, committed, "delete reconciled");
                    self.deleting = None;
                }
            }
        }
    }

    // --- Deleting ---

    /// Asks the user to confirm deleting `id`.
    pub fn request_delete(&mut self, id: ReportId) {
        if let Some(pending) = &self.deleting {
            debug!(in_flight = %pending.id, requested = %id, "delete request ignored, another delete in flight");
            return;
        }
        if !self.items.iter().any(|r| r.id == id) {
            debug!(requested = %id, "delete request for a report not in the list");
            return;
        }
        self.confirmation = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.confirmation = None;
    }

    /// Confirms the pending prompt, if any.
    pub fn confirm_pending(&mut self) -> Vec<Command> {
        match self.confirmation.take() {
            Some(id) => self.confirm_delete(id),
            None => Vec::new(),
        }
    }

    /// Removes `id` optimistically and asks the server to delete it.
    ///
    /// Only one delete runs at a time; a second call while one is in flight
    /// is ignored.
    pub fn confirm_delete(&mut self, id: ReportId) -> Vec<Command> {
        if let Some(pending) = &self.deleting {
            debug!(in_flight = %pending.id, requested = %id, "delete ignored, another delete in flight");
            return Vec::new();
        }
        self.confirmation = None;

        let pre_delete_count = self.items.len();
        let removed = self
            .items
            .iter()
            .position(|r| r.id == id)
            .map(|index| (index, self.items.remove(index)));

        let total_decremented = removed.is_some() && self.total > 0;
        if removed.is_some() {
            self.total = self.total.saturating_sub(1);
        }

        info!(report_id = %id, pre_delete_count, "saved report removed optimistically");

        self.deleting = Some(PendingDelete {
            id: id.clone(),
            pre_delete_count,
            removed,
            total_decremented,
            phase: DeletePhase::Tentative,
        });

        vec![Command::Delete { id }]
    }

    /// Commits or rolls back the tentative delete of `id`.
    ///
    /// On success the page is backfilled (more pages exist) or reloaded (the
    /// list just became empty). On failure the removed row is restored, the
    /// list is resynchronized from the server and an alert is raised.
    pub fn delete_finished(&mut self, id: &ReportId, outcome: Result<(), AppError>) -> Vec<Command> {
        let Some(mut pending) = self.deleting.take() else {
            warn!(report_id = %id, "delete completion with no delete in flight");
            return Vec::new();
        };
        if pending.id != *id || pending.phase != DeletePhase::Tentative {
            warn!(report_id = %id, in_flight = %pending.id, "unexpected delete completion dropped");
            self.deleting = Some(pending);
            return Vec::new();
        }

        let pre = pending.pre_delete_count;
        let follow_up = match outcome {
            Ok(()) => {
                info!(report_id = %id, has_more = self.has_more, "delete committed");
                if self.has_more {
                    self.load_inner(pre.saturating_sub(1), BACKFILL_LIMIT, true, false)
                        .map(|issued| (issued, true))
                } else if pre == 1 {
                    self.load_inner(0, PAGE_SIZE, false, false)
                        .map(|issued| (issued, true))
                } else {
                    None
                }
            }
            Err(error) => {
                warn!(report_id = %id, %error, "delete failed, rolling back");
                self.restore(&mut pending);
                self.alert = Some(Alert::delete_failed(&error));
                self.load_inner(0, pre.max(PAGE_SIZE), false, false)
                    .map(|issued| (issued, false))
            }
        };

        match follow_up {
            Some(((ticket, cmd), committed)) => {
                pending.phase = DeletePhase::Reconciling { ticket, committed };
                self.deleting = Some(pending);
                vec![cmd]
            }
            None => Vec::new(),
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Navigation only; the list is untouched.
    #[must_use]
    pub fn open_report(&self, id: ReportId) -> Vec<Command> {
        vec![Command::OpenReport { id }]
    }

    /// Drops all list state. Tickets keep counting so responses to requests
    /// issued before the reset are never mistaken for new ones.
    pub fn reset(&mut self) {
        let last_ticket = self.last_ticket;
        *self = Self {
            last_ticket,
            ..Self::default()
        };
    }

    // --- Internals ---

    fn load_inner(
        &mut self,
        offset: usize,
        limit: usize,
        append: bool,
        refresh: bool,
    ) -> Option<(FetchTicket, Command)> {
        if limit == 0 {
            warn!(offset, "list request with zero limit ignored");
            return None;
        }

        self.error = None;
        self.last_ticket += 1;
        let ticket = FetchTicket(self.last_ticket);
        if !append {
            self.latest_replace = Some(ticket);
        }
        self.in_flight.insert(
            ticket,
            InFlight {
                offset,
                limit,
                append,
                refresh,
            },
        );

        debug!(ticket = ticket.0, offset, limit, append, refresh, "requesting saved reports");
        Some((ticket, Command::List { ticket, offset, limit }))
    }

    fn apply_page(&mut self, page: ReportsPage, request: InFlight) {
        let ReportsPage {
            mut reports,
            mut total,
            has_more,
        } = page;

        // While a delete is tentative the server total may still count the
        // row. It is known to be gone only when the page spans the row's old
        // position and does not list it.
        if let Some(pending) = self.deleting.as_mut() {
            if pending.phase == DeletePhase::Tentative {
                let before = reports.len();
                reports.retain(|r| r.id != pending.id);
                let still_listed = reports.len() != before;
                let covers_old_slot = pending.removed.as_ref().is_some_and(|(index, _)| {
                    (request.offset..request.offset + request.limit).contains(index)
                });
                let still_counted =
                    still_listed || (pending.removed.is_some() && !covers_old_slot);

                pending.total_decremented = still_counted && total > 0;
                if still_counted {
                    total = total.saturating_sub(1);
                }
            }
        }

        self.items = if request.append {
            let mut combined = std::mem::take(&mut self.items);
            combined.extend(reports);
            dedup_last_wins(combined)
        } else {
            dedup_last_wins(reports)
        };
        self.total = total;
        self.has_more = has_more;
    }

    fn restore(&mut self, pending: &mut PendingDelete) {
        if let Some((index, report)) = pending.removed.take() {
            if !self.items.iter().any(|r| r.id == report.id) {
                let at = index.min(self.items.len());
                self.items.insert(at, report);
            }
        }
        if pending.total_decremented {
            self.total += 1;
            pending.total_decremented = false;
        }
    }
}

/// Removes duplicate ids. Each id keeps the position of its first
/// occurrence and the value of its last.
#[must_use]
pub fn dedup_last_wins(reports: Vec<ReportSummary>) -> Vec<ReportSummary> {
    let mut index: HashMap<ReportId, usize> = HashMap::with_capacity(reports.len());
    let mut out: Vec<ReportSummary> = Vec::with_capacity(reports.len());

    for report in reports {
        if let Some(&pos) = index.get(&report.id) {
            out[pos] = report;
        } else {
            index.insert(report.id.clone(), out.len());
            out.push(report);
        }
    }

    out
}

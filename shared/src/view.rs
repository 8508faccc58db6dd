use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::model::{Model, Rating, ReportSummary};
use crate::saved_reports::{Alert, DELETE_CONFIRM_MESSAGE, DELETE_CONFIRM_TITLE};

pub const UNKNOWN_DATE: &str = "Unknown date";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRow {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub duration_text: String,
    pub rating: Rating,
    pub rating_label: String,
    pub rating_color: String,
    /// Badge glyph, also used when sharing a report.
    pub rating_emoji: String,
    pub summary: String,
    pub created_text: String,
    /// Swipe action shows "Deleting…" and is disabled.
    pub deleting: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfirmView {
    pub report_id: String,
    pub title: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertView {
    pub title: String,
    pub message: String,
}

impl From<&Alert> for AlertView {
    fn from(a: &Alert) -> Self {
        Self {
            title: a.title.clone(),
            message: a.message.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenState {
    #[default]
    Loading,
    Error {
        message: String,
    },
    Empty,
    List,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ViewModel {
    pub screen: ScreenState,
    pub rows: Vec<ReportRow>,
    /// e.g. "3 reports saved"
    pub subtitle: String,
    pub total: u64,
    pub has_more: bool,
    pub loading_more: bool,
    pub refreshing: bool,
    pub confirm_delete: Option<ConfirmView>,
    pub alert: Option<AlertView>,
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        let saved = &model.saved;
        let deleting = saved.deleting_id();

        let rows: Vec<ReportRow> = saved
            .items()
            .iter()
            .map(|r| build_row(r, deleting == Some(&r.id)))
            .collect();

        let screen = if saved.is_loading() && !saved.is_refreshing() && rows.is_empty() {
            ScreenState::Loading
        } else if let Some(error) = saved.error() {
            ScreenState::Error {
                message: error.user_facing_message(),
            }
        } else if rows.is_empty() && !saved.is_loading() {
            ScreenState::Empty
        } else {
            ScreenState::List
        };

        let confirm_delete = saved.pending_confirmation().map(|id| ConfirmView {
            report_id: id.to_string(),
            title: DELETE_CONFIRM_TITLE.to_string(),
            message: DELETE_CONFIRM_MESSAGE.to_string(),
        });

        Self {
            screen,
            rows,
            subtitle: subtitle(saved.total()),
            total: saved.total(),
            has_more: saved.has_more(),
            loading_more: saved.is_loading_more(),
            refreshing: saved.is_refreshing(),
            confirm_delete,
            alert: saved.alert().map(AlertView::from),
        }
    }
}

fn build_row(report: &ReportSummary, deleting: bool) -> ReportRow {
    let rating = report.consensus.rating;
    ReportRow {
        id: report.id.to_string(),
        title: report.video.title.clone(),
        channel: report.video.channel.clone(),
        thumbnail: report.video.thumbnail.clone(),
        duration_text: report.video.duration_text(),
        rating,
        rating_label: rating.label().to_string(),
        rating_color: rating.color_hex().to_string(),
        rating_emoji: rating.emoji().to_string(),
        summary: report.consensus.summary.clone(),
        created_text: format_created_at(&report.created_at),
        deleting,
    }
}

#[must_use]
pub fn subtitle(total: u64) -> String {
    let plural = if total == 1 { "" } else { "s" };
    format!("{total} report{plural} saved")
}

/// `May 1, 2024, 09:05 AM`, in the timestamp's own offset.
#[must_use]
pub fn format_created_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw.trim()).map_or_else(
        |_| UNKNOWN_DATE.to_string(),
        |dt| dt.format("%b %-d, %Y, %I:%M %p").to_string(),
    )
}

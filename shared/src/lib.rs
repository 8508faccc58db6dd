// lib.rs - ClaimLens shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod model;
pub mod saved_reports;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{ApiConfig, ConfigError, Platform};
pub use event::Event;
pub use model::{Consensus, Model, Rating, ReportId, ReportSummary, ReportsPage, Video, VideoId};
pub use saved_reports::{Command, FetchTicket, ListState, SavedReports};
pub use view::ViewModel;

/// Page size used by the saved-reports screen for initial load, refresh and
/// infinite scroll.
pub const PAGE_SIZE: usize = 5;
/// Items fetched to fill the hole left by a committed delete.
pub const BACKFILL_LIMIT: usize = 1;
pub const DELETE_FALLBACK_DETAIL: &str = "Failed to delete";
pub const LOAD_FALLBACK_MESSAGE: &str = "Failed to load saved reports";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Validation,
    NotFound,
    Conflict,
    RateLimited,
    Server,
    Parse,
    Config,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::RateLimited => "RATE_LIMITED",
            Self::Server => "SERVER_ERROR",
            Self::Parse => "PARSE_ERROR",
            Self::Config => "CONFIG_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Transport failures that never reached the server.
    #[must_use]
    pub fn transport(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let kind = if detail.to_ascii_lowercase().contains("timed out") {
            ErrorKind::Timeout
        } else {
            ErrorKind::Network
        };
        Self::new(kind, "Network request failed").with_internal(detail)
    }

    #[must_use]
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, "Malformed response from server").with_internal(detail)
    }

    /// Builds the error for a non-2xx response. The body text is the error
    /// detail; `fallback` replaces it when the server sent nothing.
    #[must_use]
    pub fn from_http_status(status: u16, body: &[u8], fallback: &str) -> Self {
        let kind = match status {
            400 | 422 => ErrorKind::Validation,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimited,
            408 => ErrorKind::Timeout,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        };

        let text = String::from_utf8_lossy(body);
        let detail = if text.trim().is_empty() { fallback } else { text.trim() };

        Self::new(kind, format!("HTTP {status}: {detail}"))
            .with_context("http_status", status.to_string())
    }

    /// The message shown to the user. HTTP failures show the server's detail
    /// verbatim; transport and parse failures get a generic sentence.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Timeout if !self.context.contains_key("http_status") => {
                "The request timed out. Please try again.".into()
            }
            ErrorKind::Parse => {
                "The server sent an unexpected response. Please try again later.".into()
            }
            _ => self.message.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

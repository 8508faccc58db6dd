//! Saved-reports REST endpoints: request URLs and response decoding.
//!
//! Transport is Crux's HTTP capability, performed by the shell. Everything
//! here is pure so it can be tested without a shell.

use std::fmt::Display;

use crux_http::Response;
use url::Url;

use crate::config::ApiConfig;
use crate::model::{ReportId, ReportsPage};
use crate::{AppError, ErrorKind, DELETE_FALLBACK_DETAIL, LOAD_FALLBACK_MESSAGE};

pub const SAVED_REPORTS_PATH: &str = "saved-reports";

/// Status and body of a completed exchange, detached from the transport type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `GET {base}/saved-reports?limit={limit}&offset={offset}`
#[must_use]
pub fn list_url(api: &ApiConfig, offset: usize, limit: usize) -> String {
    format!(
        "{}/{SAVED_REPORTS_PATH}?limit={limit}&offset={offset}",
        api.api_base()
    )
}

/// `DELETE {base}/saved-reports/{id}`, with the id percent-encoded as a
/// single path segment.
pub fn delete_url(api: &ApiConfig, id: &ReportId) -> Result<String, AppError> {
    let mut url = Url::parse(api.api_base()).map_err(|e| {
        AppError::new(ErrorKind::Config, "Invalid API base URL").with_internal(e.to_string())
    })?;

    url.path_segments_mut()
        .map_err(|()| AppError::new(ErrorKind::Config, "API base URL cannot have a path"))?
        .pop_if_empty()
        .push(SAVED_REPORTS_PATH)
        .push(id.as_str());

    Ok(url.into())
}

/// Collapses the capability's result into status + body, or a transport
/// error when the request never completed.
pub fn from_transport<E: Display>(result: Result<Response<Vec<u8>>, E>) -> Result<RawResponse, AppError> {
    match result {
        Ok(mut response) => {
            let status = u16::from(response.status());
            let body = response.take_body().unwrap_or_default();
            Ok(RawResponse { status, body })
        }
        Err(e) => Err(AppError::transport(e.to_string())),
    }
}

pub fn decode_page(raw: RawResponse) -> Result<ReportsPage, AppError> {
    if !raw.is_success() {
        return Err(AppError::from_http_status(
            raw.status,
            &raw.body,
            LOAD_FALLBACK_MESSAGE,
        ));
    }

    serde_json::from_slice::<ReportsPage>(&raw.body).map_err(|e| AppError::parse(e.to_string()))
}

pub fn decode_delete(raw: &RawResponse) -> Result<(), AppError> {
    if raw.is_success() {
        Ok(())
    } else {
        Err(AppError::from_http_status(
            raw.status,
            &raw.body,
            DELETE_FALLBACK_DETAIL,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ApiConfig {
        ApiConfig::new("http://10.0.2.2:8000").unwrap()
    }

    #[test]
    fn test_list_url() {
        assert_eq!(
            list_url(&api(), 10, 5),
            "http://10.0.2.2:8000/saved-reports?limit=5&offset=10"
        );
    }

    #[test]
    fn test_delete_url_encodes_id() {
        let url = delete_url(&api(), &ReportId::new("abc 1/2")).unwrap();
        assert_eq!(url, "http://10.0.2.2:8000/saved-reports/abc%201%2F2");
    }

    #[test]
    fn test_delete_url_keeps_base_path() {
        let api = ApiConfig::new("https://api.example.com/v1/").unwrap();
        let url = delete_url(&api, &ReportId::new("r-9")).unwrap();
        assert_eq!(url, "https://api.example.com/v1/saved-reports/r-9");
    }

    #[test]
    fn test_decode_page_ok() {
        let body = serde_json::json!({
            "reports": [{
                "id": "r-1",
                "video": { "id": "v", "title": "t", "channel": "c", "thumbnail": "x", "durationSec": 10 },
                "consensus": { "rating": "solid", "summary": "ok" },
                "created_at": "2024-05-01T12:00:00+00:00"
            }],
            "total": 7,
            "has_more": true
        });
        let raw = RawResponse::new(200, serde_json::to_vec(&body).unwrap());

        let page = decode_page(raw).unwrap();
        assert_eq!(page.reports.len(), 1);
        assert_eq!(page.total, 7);
        assert!(page.has_more);
    }

    #[test]
    fn test_decode_page_http_error() {
        let err = decode_page(RawResponse::new(500, "boom")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, "HTTP 500: boom");
    }

    #[test]
    fn test_decode_page_malformed() {
        let err = decode_page(RawResponse::new(200, "{\"reports\": 3}")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert!(err.internal_message.is_some());
    }

    #[test]
    fn test_decode_delete() {
        assert!(decode_delete(&RawResponse::new(204, "")).is_ok());
        assert!(decode_delete(&RawResponse::new(200, "{}")).is_ok());

        let err = decode_delete(&RawResponse::new(404, "")).unwrap_err();
        assert_eq!(err.message, "HTTP 404: Failed to delete");
        let err = decode_delete(&RawResponse::new(500, "locked")).unwrap_err();
        assert_eq!(err.message, "HTTP 500: locked");
    }

    #[test]
    fn test_from_transport_error() {
        let result: Result<Response<Vec<u8>>, &str> = Err("connection refused");
        let err = from_transport(result).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.internal_message.as_deref(), Some("connection refused"));
    }
}

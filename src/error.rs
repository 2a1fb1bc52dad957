use ntex::http::StatusCode;
use ntex::web::{HttpResponse, WebResponseError};
use std::fmt;
use thiserror::Error;

/// Failures raised by heat mutations and the history store.
#[derive(Error, Debug)]
pub enum HeatError {
    #[error("Score must be between 0 and 10, got {0}")]
    ScoreOutOfRange(f64),
    #[error("Invalid score: {0:?}")]
    ScoreNotNumeric(String),
    #[error("Interference code {code} is outside 0..{max}")]
    InvalidCode { code: i64, max: u8 },
    #[error("Surfer index {0} is out of range")]
    SurferIndex(usize),
    #[error("Wave index {0} is out of range")]
    WaveIndex(usize),
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("history store: {0}")]
    History(#[from] rusqlite::Error),
}

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {}", e),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &str) {
        match self {
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        }
    }
}

impl WebResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_and_message().0
    }

    fn error_response(&self, _: &ntex::web::HttpRequest) -> HttpResponse {
        let (status, message) = self.status_and_message();
        HttpResponse::build(status).json(&serde_json::json!({ "error": message }))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<HeatError> for AppError {
    fn from(e: HeatError) -> Self {
        match e {
            HeatError::SurferIndex(_) | HeatError::WaveIndex(_) => {
                log::error!("contract violation: {}", e);
                AppError::NotFound(e.to_string())
            }
            HeatError::History(inner) => AppError::Db(inner),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(e: HeatError) -> (AppError, StatusCode) {
        let app = AppError::from(e);
        let status = app.status_code();
        (app, status)
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let cases = [
            HeatError::ScoreOutOfRange(11.0),
            HeatError::ScoreNotNumeric("abc".into()),
            HeatError::InvalidCode { code: 9, max: 7 },
            HeatError::InvalidField {
                field: "duration",
                reason: "must be between 1 and 120".into(),
            },
        ];
        for case in cases {
            let expected = case.to_string();
            let (app, status) = mapped(case);
            assert_eq!(status, StatusCode::BAD_REQUEST);
            match app {
                AppError::BadRequest(msg) => assert_eq!(msg, expected),
                other => panic!("expected BadRequest, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_index_errors_are_not_found() {
        let (app, status) = mapped(HeatError::SurferIndex(5));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(matches!(app, AppError::NotFound(ref msg) if msg == "Surfer index 5 is out of range"));

        let (app, status) = mapped(HeatError::WaveIndex(20));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(matches!(app, AppError::NotFound(ref msg) if msg == "Wave index 20 is out of range"));
    }

    #[test]
    fn test_history_errors_hide_details() {
        let (app, status) = mapped(HeatError::History(rusqlite::Error::QueryReturnedNoRows));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(app, AppError::Db(rusqlite::Error::QueryReturnedNoRows)));
        assert_eq!(app.status_and_message().1, "Database error");
    }

    #[test]
    fn test_csv_errors_are_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let app = AppError::from(csv::Error::from(io));
        assert_eq!(app.status_and_message(), (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"));
    }
}

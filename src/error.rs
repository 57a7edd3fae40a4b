use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::reminder::ReminderError;
use crate::screens::DraftError;

const STORAGE_FAILED: &str = "Could not save or load reflections";

#[derive(Debug)]
pub enum AppError {
    Database(sqlx::Error),
    Template(askama::Error),
    Reminder(ReminderError),
    Validation(HashMap<String, String>),
    Conflict(&'static str),
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
            }
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            AppError::Conflict(message) => {
                (StatusCode::CONFLICT, Json(json!({ "error": message }))).into_response()
            }
            AppError::Reminder(ReminderError::InvalidTime { hour, minute }) => {
                let mut errors = HashMap::new();
                errors.insert(
                    "time".to_string(),
                    format!("{hour:02}:{minute:02} is not a valid time of day"),
                );
                AppError::Validation(errors).into_response()
            }
            AppError::Reminder(e) => {
                tracing::error!("Reminder error: {e}");
                internal_error("Could not update the reminder")
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                internal_error(STORAGE_FAILED)
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                internal_error("Internal server error")
            }
        }
    }
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<ReminderError> for AppError {
    fn from(e: ReminderError) -> Self {
        AppError::Reminder(e)
    }
}

impl From<DraftError> for AppError {
    fn from(e: DraftError) -> Self {
        match e {
            DraftError::NotReady => {
                let mut errors = HashMap::new();
                errors.insert("note".to_string(), "Note is required".to_string());
                AppError::Validation(errors)
            }
            DraftError::Store(e) => AppError::Database(e),
        }
    }
}

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReminderForm {
    hour: u32,
    minute: u32,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/reminder",
        get(show_reminder).put(schedule_reminder).delete(cancel_reminder),
    )
}

async fn show_reminder(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.reminders.status().await?))
}

async fn schedule_reminder(
    State(state): State<AppState>,
    Json(form): Json<ReminderForm>,
) -> Result<impl IntoResponse, AppError> {
    state
        .reminders
        .schedule_daily_reminder(form.hour, form.minute)
        .await?;
    Ok(Json(state.reminders.status().await?))
}

async fn cancel_reminder(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.reminders.cancel_all_reminders().await?;
    Ok(StatusCode::NO_CONTENT)
}

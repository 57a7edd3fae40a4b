use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::AppError;
use crate::models::Reflection;
use crate::AppState;

#[derive(Serialize)]
struct ExportData {
    exported_at: String,
    reflections: Vec<Reflection>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/export", get(export_data))
}

async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let export = ExportData {
        exported_at: chrono::Utc::now().to_rfc3339(),
        reflections: state.store.get_all_reflections().await?,
    };

    let filename = format!("dailyquotes-export-{}.json", chrono::Local::now().format("%Y-%m-%d"));
    let content_disposition = format!("attachment; filename=\"{}\"", filename);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(value) = HeaderValue::from_str(&content_disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((headers, Json(export)))
}

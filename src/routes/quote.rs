use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::share::quote_share_text;
use crate::AppState;

#[derive(Deserialize, Default)]
pub struct ShareQuoteForm {
    take: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", get(show_quote))
        .route("/quote/refresh", post(refresh_quote))
        .route("/quote/share", post(share_quote))
}

async fn show_quote(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.quote.current())
}

async fn refresh_quote(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.quote.refresh().await)
}

async fn share_quote(
    State(state): State<AppState>,
    Json(form): Json<ShareQuoteForm>,
) -> Result<impl IntoResponse, AppError> {
    let Some(quote) = state.quote.quote() else {
        return Err(AppError::Conflict("No quote to share yet"));
    };

    let text = quote_share_text(&quote, form.take.as_deref())?;
    state.share.share_text(&text);

    Ok((StatusCode::ACCEPTED, Json(json!({ "text": text }))))
}

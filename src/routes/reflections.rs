use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::models::Quote;
use crate::screens::{ReflectionDraft, ReflectionList};
use crate::share::reflection_share_text;
use crate::AppState;

#[derive(Deserialize)]
pub struct ReflectionForm {
    quote_content: String,
    author: String,
    note: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    tag: Option<String>,
}

#[derive(Deserialize)]
pub struct ShareReflectionForm {
    take: Option<String>,
    #[serde(default = "include_note_default")]
    include_note: bool,
}

fn include_note_default() -> bool {
    true
}

fn validate_reflection_form(form: &ReflectionForm) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    if form.quote_content.trim().is_empty() {
        errors.insert("quote_content".to_string(), "Quote is required".to_string());
    }

    if form.author.trim().is_empty() {
        errors.insert("author".to_string(), "Author is required".to_string());
    }

    if form.note.trim().is_empty() {
        errors.insert("note".to_string(), "Note is required".to_string());
    }

    errors
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reflections", get(list_reflections))
        .route("/reflections", post(create_reflection))
        .route("/reflections/{id}", delete(delete_reflection))
        .route("/reflections/{id}/share", post(share_reflection))
}

async fn list_reflections(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut list = ReflectionList::load(&state.store).await?;
    list.filter_by_tag(query.tag.filter(|t| !t.is_empty()));
    Ok(Json(list))
}

async fn create_reflection(
    State(state): State<AppState>,
    Json(form): Json<ReflectionForm>,
) -> Result<impl IntoResponse, AppError> {
    let errors = validate_reflection_form(&form);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut draft = ReflectionDraft::new(Vec::new());
    draft.set_note(form.note);
    for tag in &form.tags {
        draft.add_tag(tag);
    }

    let quote = Quote::new(form.quote_content, form.author);
    let id = draft.save(&state.store, &quote).await?;

    tracing::info!(reflection_id = id, tags = draft.tags().len(), "reflection saved");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn delete_reflection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete_reflection(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn share_reflection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<ShareReflectionForm>,
) -> Result<impl IntoResponse, AppError> {
    let Some(reflection) = state.store.get_reflection(id).await? else {
        return Err(AppError::NotFound);
    };

    let text = reflection_share_text(&reflection, form.take.as_deref(), form.include_note)?;
    state.share.share_text(&text);

    Ok((StatusCode::ACCEPTED, Json(json!({ "text": text }))))
}

use axum::{
    extract::{RawQuery, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use url::form_urlencoded;

use crate::error::AppError;
use crate::screens::ReflectionDraft;
use crate::AppState;

/// `?input=wor&attached=Work&attached=Goals`. Tags already on the
/// reflection come as repeated `attached` keys since names may hold commas.
#[derive(Debug, Default, PartialEq)]
pub struct SuggestionQuery {
    input: String,
    attached: Vec<String>,
}

impl SuggestionQuery {
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "input" => parsed.input = value.into_owned(),
                "attached" => parsed.attached.push(value.into_owned()),
                _ => {}
            }
        }
        parsed
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags))
        .route("/tags/suggestions", get(suggest))
}

async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.store.get_all_tags().await?))
}

async fn suggest(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, AppError> {
    let query = SuggestionQuery::parse(query.as_deref().unwrap_or_default());

    let mut draft = ReflectionDraft::load(&state.store).await?;
    for tag in &query.attached {
        draft.add_tag(tag);
    }
    draft.set_tag_input(query.input);

    Ok(Json(draft.suggestions().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_attached_keys_keep_commas() {
        let query = SuggestionQuery::parse("input=wo&attached=a%2Cb&attached=Work&page=2");
        assert_eq!(
            query,
            SuggestionQuery {
                input: "wo".to_string(),
                attached: vec!["a,b".to_string(), "Work".to_string()],
            }
        );
    }

    #[test]
    fn empty_query_is_default() {
        assert_eq!(SuggestionQuery::parse(""), SuggestionQuery::default());
    }
}

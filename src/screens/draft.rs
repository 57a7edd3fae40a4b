use serde::Serialize;

use crate::models::Quote;
use crate::store::ReflectionStore;
use crate::suggest::{suggest_tags, SEED_TAGS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftPhase {
    Editing,
    Saving,
    Saved,
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("reflection cannot be saved: the note is blank or a save already ran")]
    NotReady,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// A reflection being written against a quote.
///
/// Moves from `Editing` to `Saving` to `Saved`; `Saved` is terminal and a
/// new reflection needs a new draft. Suggestions are recomputed from the tag
/// history on every input change and on every tag add or removal.
#[derive(Debug, Clone, Serialize)]
pub struct ReflectionDraft {
    note: String,
    tags: Vec<String>,
    tag_input: String,
    suggestions: Vec<String>,
    phase: DraftPhase,
    #[serde(skip)]
    history: Vec<String>,
}

impl ReflectionDraft {
    pub fn new(history: Vec<String>) -> Self {
        let mut draft = Self {
            note: String::new(),
            tags: Vec::new(),
            tag_input: String::new(),
            suggestions: Vec::new(),
            phase: DraftPhase::Editing,
            history,
        };
        draft.refresh_suggestions();
        draft
    }

    /// Start a draft with the stored tag history, falling back to
    /// [`SEED_TAGS`] when no tag has been used yet.
    pub async fn load(store: &ReflectionStore) -> Result<Self, sqlx::Error> {
        let mut history = store.get_all_tags().await?;
        if history.is_empty() {
            history = SEED_TAGS.iter().map(|t| t.to_string()).collect();
        }
        Ok(Self::new(history))
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn set_tag_input(&mut self, input: impl Into<String>) {
        self.tag_input = input.into();
        self.refresh_suggestions();
    }

    /// Attach a tag. Blank and already attached names are ignored. Returns
    /// whether the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let trimmed = tag.trim();
        if trimmed.is_empty() || self.tags.iter().any(|t| t == trimmed) {
            return false;
        }
        self.tags.push(trimmed.to_string());
        self.tag_input.clear();
        self.refresh_suggestions();
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
        self.refresh_suggestions();
    }

    pub fn can_save(&self) -> bool {
        self.phase == DraftPhase::Editing && !self.note.trim().is_empty()
    }

    /// Persist the draft against `quote`. On failure the draft goes back to
    /// `Editing` so the save can be retried.
    pub async fn save(&mut self, store: &ReflectionStore, quote: &Quote) -> Result<i64, DraftError> {
        if !self.can_save() {
            return Err(DraftError::NotReady);
        }

        self.phase = DraftPhase::Saving;
        match store
            .save_reflection(&quote.text, &quote.author, &self.note, &self.tags)
            .await
        {
            Ok(id) => {
                self.phase = DraftPhase::Saved;
                Ok(id)
            }
            Err(e) => {
                self.phase = DraftPhase::Editing;
                Err(e.into())
            }
        }
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = suggest_tags(&self.history, &self.tag_input, &self.tags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<String> {
        ["Work", "Workouts", "Family"].iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn starts_editing_with_history_suggestions() {
        let draft = ReflectionDraft::new(history());
        assert_eq!(draft.phase(), DraftPhase::Editing);
        assert_eq!(draft.suggestions(), history().as_slice());
        assert!(!draft.can_save());
    }

    #[test]
    fn typing_filters_suggestions() {
        let mut draft = ReflectionDraft::new(history());
        draft.set_tag_input("wor");
        assert_eq!(draft.suggestions(), ["Work", "Workouts"]);
    }

    #[test]
    fn adding_a_tag_clears_input_and_hides_it() {
        let mut draft = ReflectionDraft::new(history());
        draft.set_tag_input("wor");
        assert!(draft.add_tag(" Work "));
        assert_eq!(draft.tags(), ["Work"]);
        assert_eq!(draft.tag_input(), "");
        assert_eq!(draft.suggestions(), ["Workouts", "Family"]);
    }

    #[test]
    fn duplicate_and_blank_tags_are_ignored() {
        let mut draft = ReflectionDraft::new(history());
        assert!(draft.add_tag("Work"));
        assert!(!draft.add_tag("Work"));
        assert!(!draft.add_tag("   "));
        assert_eq!(draft.tags(), ["Work"]);
    }

    #[test]
    fn removing_a_tag_keeps_current_input() {
        let mut draft = ReflectionDraft::new(history());
        draft.add_tag("Work");
        draft.set_tag_input("wor");
        assert_eq!(draft.suggestions(), ["Workouts"]);
        draft.remove_tag("Work");
        assert_eq!(draft.suggestions(), ["Work", "Workouts"]);
        assert_eq!(draft.tag_input(), "wor");
    }

    #[test]
    fn blank_note_cannot_be_saved() {
        let mut draft = ReflectionDraft::new(history());
        draft.set_note("  \n ");
        assert!(!draft.can_save());
        draft.set_note("Grateful for the walk");
        assert!(draft.can_save());
    }
}

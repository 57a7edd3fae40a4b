use serde::Serialize;

use crate::models::Reflection;
use crate::store::ReflectionStore;

/// Past reflections with an optional tag filter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReflectionList {
    #[serde(skip)]
    pub reflections: Vec<Reflection>,
    #[serde(rename = "reflections")]
    pub filtered: Vec<Reflection>,
    pub all_tags: Vec<String>,
    pub selected_tag: Option<String>,
}

impl ReflectionList {
    pub async fn load(store: &ReflectionStore) -> Result<Self, sqlx::Error> {
        let reflections = store.get_all_reflections().await?;
        let all_tags = store.get_all_tags().await?;
        Ok(Self {
            filtered: reflections.clone(),
            reflections,
            all_tags,
            selected_tag: None,
        })
    }

    /// Show only reflections carrying `tag`, or everything for `None`.
    pub fn filter_by_tag(&mut self, tag: Option<String>) {
        self.filtered = match &tag {
            Some(tag) => self
                .reflections
                .iter()
                .filter(|r| r.has_tag(tag))
                .cloned()
                .collect(),
            None => self.reflections.clone(),
        };
        self.selected_tag = tag;
    }
}

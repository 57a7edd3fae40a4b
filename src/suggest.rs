/// Upper bound on suggestions shown before the user starts typing.
pub const EMPTY_INPUT_LIMIT: usize = 8;

/// Suggestions offered when no tag has ever been stored.
pub const SEED_TAGS: [&str; 8] = [
    "Work",
    "Family",
    "Meetings",
    "Workouts",
    "Relationships",
    "Goals",
    "Gratitude",
    "Health",
];

/// Filter the tag history for the authoring form.
///
/// With an empty input the first [`EMPTY_INPUT_LIMIT`] history tags are
/// returned; otherwise every tag containing `input` (ignoring case). Tags in
/// `attached` are never suggested and history order is kept.
pub fn suggest_tags(history: &[String], input: &str, attached: &[String]) -> Vec<String> {
    let available = history.iter().filter(|tag| !attached.contains(*tag));

    if input.is_empty() {
        return available.take(EMPTY_INPUT_LIMIT).cloned().collect();
    }

    let needle = input.to_lowercase();
    available
        .filter(|tag| tag.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

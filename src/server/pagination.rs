use serde::Deserialize;

use super::deserializers::{deserialize_page, first_page};

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N` query, 1-based. Anything that is not an integer reads as page 1.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

/// Slice `[(page - 1) * QUESTIONS_PER_PAGE, page * QUESTIONS_PER_PAGE)` of
/// `items`, clamped to its length. Pages below 1 are empty.
pub fn page_of<T>(items: &[T], page: i64) -> &[T] {
    if page < 1 {
        return &[];
    }
    let start = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}

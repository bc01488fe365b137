use serde::Serialize;

/// Primary keys of a search page, plus the unpaged total when requested
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdSearchResult {
    pub ids: Vec<String>,
    pub total: Option<i64>,
}

impl IdSearchResult {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

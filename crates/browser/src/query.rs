use serde::{Deserialize, Serialize};

/// Row ordering. `Newest` treats append order as chronological and shows the
/// most recently appended record first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    /// Case-insensitive by the `name` field.
    Name,
}

/// Search text, ordering and requested page (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

impl Default for BrowseQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            sort: SortMode::default(),
            page: first_page(),
        }
    }
}

impl BrowseQuery {
    pub fn search(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

use serde::{Deserialize, Serialize};

/// Paged envelope returned by list and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub size: i64,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.number + 1 >= self.total_pages
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            number: 0,
            size: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_dir: SortDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort_by: "createdAt".to_string(),
            sort_dir: SortDir::Desc,
        }
    }
}

impl PageQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            ..Self::default()
        }
    }
}

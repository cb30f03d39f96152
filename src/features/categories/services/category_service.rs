use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::Category;
use crate::shared::constants::UNCATEGORIZED_LABEL;

/// Read-only lookup over the category list supplied at startup.
///
/// The list order is preserved; its first entry is the default category
/// for new records.
#[derive(Debug, Clone, Default)]
pub struct CategoryService {
    categories: Vec<Category>,
}

impl CategoryService {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// List all categories in supplied order
    pub fn list(&self) -> Vec<CategoryResponseDto> {
        self.categories.iter().map(CategoryResponseDto::from).collect()
    }

    /// Id of the first category, used as the create-form default
    pub fn first_id(&self) -> Option<&str> {
        self.categories.first().map(|c| c.id.as_str())
    }

    pub fn find(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Display name for a record's category id.
    ///
    /// Absent, empty or unknown ids resolve to "Uncategorized".
    pub fn display_name(&self, id: Option<&str>) -> &str {
        id.filter(|id| !id.is_empty())
            .and_then(|id| self.find(id))
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED_LABEL)
    }
}

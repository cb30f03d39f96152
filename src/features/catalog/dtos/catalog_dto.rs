use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::catalog::form::{FormController, FormFields, FormMode};
use crate::features::catalog::models::FileRecord;
use crate::features::catalog::projection::{CategoryFilter, PartitionMode, ProjectionQuery};

// =============================================================================
// RECORD DTOs
// =============================================================================

/// Response DTO for a catalog record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileRecordResponseDto {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<String>,
    /// Resolved category name ("Uncategorized" when absent or unknown)
    pub category_name: String,
    pub spreadsheet_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Synthetic size in bytes
    pub file_size: Option<u64>,
    pub description: Option<String>,
    pub is_pinned: bool,
}

impl FileRecordResponseDto {
    pub fn new(record: &FileRecord, category_name: &str) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            category_id: record.category_id.clone(),
            category_name: category_name.to_string(),
            spreadsheet_url: record.spreadsheet_url.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            file_size: record.file_size,
            description: record.description.clone(),
            is_pinned: record.is_pinned,
        }
    }
}

// =============================================================================
// LIST / PROJECTION DTOs
// =============================================================================

/// Partitioning of the list view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDto {
    /// Pinned records, then unpinned
    #[default]
    Pinned,
    /// The most recently updated records, then the rest
    Recent,
}

/// Query params for listing catalog records
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListFilesQuery {
    /// Case-insensitive search over name, description and category name
    pub search: Option<String>,
    /// Category id, or "all" (default)
    pub category: Option<String>,
    /// Partitioning (default: pinned)
    #[serde(default)]
    pub layout: LayoutDto,
}

impl ListFilesQuery {
    pub fn into_projection_query(self, recent_count: usize) -> ProjectionQuery {
        let mode = match self.layout {
            LayoutDto::Pinned => PartitionMode::Pinned,
            LayoutDto::Recent => PartitionMode::Recent {
                count: recent_count,
            },
        };

        ProjectionQuery {
            search: self.search.unwrap_or_default(),
            category: CategoryFilter::parse(self.category.as_deref()),
            mode,
        }
    }
}

/// One side of the partitioned list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartitionDto {
    /// "pinned"/"unpinned" or "recent"/"other"
    pub label: String,
    pub records: Vec<FileRecordResponseDto>,
}

/// Filtered, sorted and partitioned catalog view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogViewDto {
    pub layout: LayoutDto,
    pub primary: PartitionDto,
    pub secondary: PartitionDto,
    /// Number of records matching the filter
    pub matched: usize,
    /// Number of records in the catalog
    pub total: usize,
    /// Whether the current user may add, edit, delete and pin
    pub can_manage: bool,
}

// =============================================================================
// FORM DTOs
// =============================================================================

/// Request DTO for creating or editing a record
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FileFormDto {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "category_id is required"))]
    pub category_id: String,

    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(min = 1, message = "spreadsheet_url is required"))]
    pub spreadsheet_url: String,

    #[validate(length(max = 5000, message = "description must not exceed 5000 characters"))]
    pub description: Option<String>,
}

impl From<FileFormDto> for FormFields {
    fn from(dto: FileFormDto) -> Self {
        Self {
            name: dto.name,
            category_id: dto.category_id,
            spreadsheet_url: dto.spreadsheet_url,
            description: dto.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormModeDto {
    Create,
    Edit,
}

/// Initial values for a create or edit form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormDraftDto {
    pub mode: FormModeDto,
    /// Record being edited (edit mode only)
    pub record_id: Option<Uuid>,
    pub name: String,
    pub category_id: String,
    pub spreadsheet_url: String,
    pub description: String,
}

impl FormDraftDto {
    /// Snapshot of an open form; `None` when the form is closed
    pub fn from_form(form: &FormController) -> Option<Self> {
        let (mode, record_id) = match form.mode()? {
            FormMode::Create => (FormModeDto::Create, None),
            FormMode::Edit(id) => (FormModeDto::Edit, Some(id)),
        };
        let fields = form.fields();

        Some(Self {
            mode,
            record_id,
            name: fields.name.clone(),
            category_id: fields.category_id.clone(),
            spreadsheet_url: fields.spreadsheet_url.clone(),
            description: fields.description.clone(),
        })
    }
}

// =============================================================================
// DELETE DTOs
// =============================================================================

/// Answer to the delete confirmation prompt
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DeleteFileQuery {
    /// Only `true` removes the record; any other value declines
    pub confirm: Option<String>,
}

impl DeleteFileQuery {
    pub fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("true")
    }
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    /// False when the confirmation was declined
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_maps_layout_and_category() {
        let query = ListFilesQuery {
            search: Some("budget".to_string()),
            category: Some("all".to_string()),
            layout: LayoutDto::Recent,
        }
        .into_projection_query(4);

        assert_eq!(query.search, "budget");
        assert_eq!(query.category, CategoryFilter::All);
        assert_eq!(query.mode, PartitionMode::Recent { count: 4 });
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListFilesQuery::default().into_projection_query(3);
        assert_eq!(query.search, "");
        assert_eq!(query.mode, PartitionMode::Pinned);
    }

    #[test]
    fn test_form_dto_validation() {
        let valid = FileFormDto {
            name: "Budget 2025".to_string(),
            category_id: "fin".to_string(),
            spreadsheet_url: "https://example.com/sheet".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = FileFormDto {
            name: String::new(),
            spreadsheet_url: "nope".to_string(),
            ..valid
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("spreadsheet_url"));
    }

    #[test]
    fn test_delete_query_only_accepts_literal_true() {
        let answer = |confirm: Option<&str>| DeleteFileQuery {
            confirm: confirm.map(str::to_string),
        };

        assert!(answer(Some("true")).confirmed());
        assert!(!answer(None).confirmed());
        assert!(!answer(Some("yes")).confirmed());
        assert!(!answer(Some("TRUE")).confirmed());
    }

    #[test]
    fn test_draft_of_closed_form_is_none() {
        assert!(FormDraftDto::from_form(&FormController::new()).is_none());
    }
}

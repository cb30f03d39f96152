use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::dtos::{
    CatalogViewDto, DeleteFileResponseDto, FileRecordResponseDto, FormDraftDto, ListFilesQuery,
    PartitionDto,
};
use crate::features::catalog::form::{FormController, FormFields};
use crate::features::catalog::models::FileRecord;
use crate::features::catalog::projection;
use crate::features::catalog::store::{DeleteOutcome, RecordStore};
use crate::features::categories::CategoryService;

/// Service for catalog operations.
///
/// The record store sits behind a single lock; every command runs to
/// completion under the write lock before the next one starts.
pub struct CatalogService {
    store: RwLock<RecordStore>,
    categories: Arc<CategoryService>,
    recent_count: usize,
}

impl CatalogService {
    pub fn new(store: RecordStore, categories: Arc<CategoryService>, recent_count: usize) -> Self {
        Self {
            store: RwLock::new(store),
            categories,
            recent_count,
        }
    }

    fn to_dto(&self, record: &FileRecord) -> FileRecordResponseDto {
        let category_name = self
            .categories
            .display_name(record.category_id.as_deref());
        FileRecordResponseDto::new(record, category_name)
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("File record '{}' not found", id))
    }

    /// Filtered, sorted and partitioned view of the catalog
    pub async fn list(&self, query: ListFilesQuery, can_manage: bool) -> CatalogViewDto {
        let layout = query.layout;
        let query = query.into_projection_query(self.recent_count);

        let store = self.store.read().await;
        let view = projection::project(store.records(), &self.categories, &query);
        let (primary_label, secondary_label) = view.mode.labels();

        let dtos = |records: &[&FileRecord]| -> Vec<FileRecordResponseDto> {
            records.iter().map(|r| self.to_dto(r)).collect()
        };

        CatalogViewDto {
            layout,
            primary: PartitionDto {
                label: primary_label.to_string(),
                records: dtos(&view.primary),
            },
            secondary: PartitionDto {
                label: secondary_label.to_string(),
                records: dtos(&view.secondary),
            },
            matched: view.matched(),
            total: store.len(),
            can_manage,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<FileRecordResponseDto> {
        let store = self.store.read().await;
        store
            .get(id)
            .map(|r| self.to_dto(r))
            .ok_or_else(|| Self::not_found(id))
    }

    /// URL to open for a record
    pub async fn sheet_url(&self, id: Uuid) -> Result<String> {
        let store = self.store.read().await;
        store
            .get(id)
            .map(|r| r.spreadsheet_url.clone())
            .ok_or_else(|| Self::not_found(id))
    }

    /// Default values of a blank create form
    pub fn create_draft(&self) -> Result<FormDraftDto> {
        let mut form = FormController::new();
        form.open_create(&self.categories);
        FormDraftDto::from_form(&form)
            .ok_or_else(|| AppError::Internal("create form did not open".to_string()))
    }

    /// Current values of a record as an edit form
    pub async fn edit_draft(&self, id: Uuid) -> Result<FormDraftDto> {
        let store = self.store.read().await;
        let record = store.get(id).ok_or_else(|| Self::not_found(id))?;

        let mut form = FormController::new();
        form.open_edit(record);
        FormDraftDto::from_form(&form)
            .ok_or_else(|| AppError::Internal("edit form did not open".to_string()))
    }

    pub async fn create(&self, fields: FormFields) -> Result<FileRecordResponseDto> {
        let mut form = FormController::new();
        form.open_create(&self.categories);
        form.set_fields(fields);

        let mut store = self.store.write().await;
        let record = form.submit(&mut store, Utc::now()).inspect_err(|e| {
            tracing::debug!("Create form rejected: {}", e);
        })?;

        tracing::info!(record_id = %record.id, name = %record.name, "File record created");
        Ok(self.to_dto(&record))
    }

    pub async fn update(&self, id: Uuid, fields: FormFields) -> Result<FileRecordResponseDto> {
        let mut store = self.store.write().await;
        let current = store.get(id).ok_or_else(|| Self::not_found(id))?;

        let mut form = FormController::new();
        form.open_edit(current);
        form.set_fields(fields);

        let record = form.submit(&mut store, Utc::now()).inspect_err(|e| {
            tracing::debug!(record_id = ?form.editing(), "Edit form rejected: {}", e);
        })?;

        tracing::info!(record_id = %record.id, "File record updated");
        Ok(self.to_dto(&record))
    }

    /// Delete a record if the caller confirmed
    pub async fn delete(&self, id: Uuid, confirmed: bool) -> Result<DeleteFileResponseDto> {
        let mut store = self.store.write().await;
        let outcome = store.delete(id, |_: &FileRecord| confirmed)?;

        let deleted = match outcome {
            DeleteOutcome::Deleted(record) => {
                tracing::info!(record_id = %record.id, name = %record.name, "File record deleted");
                true
            }
            DeleteOutcome::Declined => {
                tracing::debug!(record_id = %id, "Delete declined");
                false
            }
        };

        Ok(DeleteFileResponseDto { deleted })
    }

    pub async fn toggle_pin(&self, id: Uuid) -> Result<FileRecordResponseDto> {
        let mut store = self.store.write().await;
        let record = store.toggle_pin(id, Utc::now())?;

        tracing::info!(
            record_id = %record.id,
            pinned = record.is_pinned,
            "File record pin toggled"
        );
        Ok(self.to_dto(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::dtos::{FormModeDto, LayoutDto};
    use crate::features::categories::models::Category;

    fn service() -> CatalogService {
        let categories = Arc::new(CategoryService::new(vec![
            Category::new("fin", "Finance"),
            Category::new("ops", "Operations"),
        ]));
        CatalogService::new(RecordStore::new(), categories, 3)
    }

    fn fields(name: &str) -> FormFields {
        FormFields {
            name: name.to_string(),
            category_id: "fin".to_string(),
            spreadsheet_url: "https://example.com/sheet".to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_appears_in_unpinned_partition() {
        let service = service();
        let created = service.create(fields("Budget 2025")).await.unwrap();

        assert_eq!(created.category_name, "Finance");
        assert!(!created.is_pinned);

        let view = service.list(ListFilesQuery::default(), true).await;
        assert_eq!(view.primary.label, "pinned");
        assert!(view.primary.records.is_empty());
        assert_eq!(view.secondary.records[0].id, created.id);
        assert_eq!(view.total, 1);
    }

    #[tokio::test]
    async fn test_pin_moves_record_between_partitions() {
        let service = service();
        let a = service.create(fields("A")).await.unwrap();
        service.create(fields("B")).await.unwrap();

        let pinned = service.toggle_pin(a.id).await.unwrap();
        assert!(pinned.is_pinned);
        assert!(pinned.updated_at >= a.updated_at);

        let view = service.list(ListFilesQuery::default(), false).await;
        assert_eq!(view.primary.records.len(), 1);
        assert_eq!(view.primary.records[0].id, a.id);
        assert_eq!(view.secondary.records.len(), 1);
        assert!(!view.can_manage);
    }

    #[tokio::test]
    async fn test_recent_layout_uses_configured_count() {
        let service = service();
        for name in ["a", "b", "c", "d", "e"] {
            service.create(fields(name)).await.unwrap();
        }

        let query = ListFilesQuery {
            layout: LayoutDto::Recent,
            ..Default::default()
        };
        let view = service.list(query, true).await;

        assert_eq!(view.primary.label, "recent");
        assert_eq!(view.primary.records.len(), 3);
        assert_eq!(view.secondary.label, "other");
        assert_eq!(view.secondary.records.len(), 2);
    }

    #[tokio::test]
    async fn test_declined_delete_keeps_record() {
        let service = service();
        let created = service.create(fields("Keep me")).await.unwrap();

        let declined = service.delete(created.id, false).await.unwrap();
        assert!(!declined.deleted);
        assert!(service.get(created.id).await.is_ok());

        let confirmed = service.delete(created.id, true).await.unwrap();
        assert!(confirmed.deleted);
        assert!(matches!(
            service.get(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_drafts() {
        let service = service();
        let blank = service.create_draft().unwrap();
        assert_eq!(blank.mode, FormModeDto::Create);
        assert_eq!(blank.category_id, "fin");
        assert_eq!(blank.record_id, None);

        let created = service.create(fields("Roster")).await.unwrap();
        let draft = service.edit_draft(created.id).await.unwrap();
        assert_eq!(draft.mode, FormModeDto::Edit);
        assert_eq!(draft.record_id, Some(created.id));
        assert_eq!(draft.name, "Roster");
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let service = service();
        let created = service.create(fields("Roster")).await.unwrap();

        let err = service.update(created.id, fields("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let unchanged = service.get(created.id).await.unwrap();
        assert_eq!(unchanged.name, "Roster");
    }
}

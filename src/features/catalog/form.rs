//! Create/edit form state.
//!
//! The controller holds the transient field values while a form is open and
//! turns them into a store command on submit. A successful submit closes the
//! form; a failed one leaves it open with the entered values.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::features::catalog::models::{FileRecord, FileRecordChanges};
use crate::features::catalog::store::{RecordStore, StoreError};
use crate::features::categories::CategoryService;
use crate::shared::constants::{SYNTHETIC_FILE_SIZE_MAX, SYNTHETIC_FILE_SIZE_MIN};
use crate::shared::validation::is_spreadsheet_url;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("no form is open")]
    NotOpen,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("spreadsheet_url must be an http(s) URL, got '{0}'")]
    InvalidUrl(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The four editable values of a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub category_id: String,
    pub spreadsheet_url: String,
    pub description: String,
}

impl FormFields {
    fn from_record(record: &FileRecord) -> Self {
        Self {
            name: record.name.clone(),
            category_id: record.category_id.clone().unwrap_or_default(),
            spreadsheet_url: record.spreadsheet_url.clone(),
            description: record.description.clone().unwrap_or_default(),
        }
    }

    fn validated(&self) -> Result<FileRecordChanges, FormError> {
        let name = required(&self.name, "name")?;
        let category_id = required(&self.category_id, "category_id")?;
        let spreadsheet_url = required(&self.spreadsheet_url, "spreadsheet_url")?;

        if !is_spreadsheet_url(&spreadsheet_url) {
            return Err(FormError::InvalidUrl(spreadsheet_url));
        }

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(FileRecordChanges {
            name,
            category_id: Some(category_id),
            spreadsheet_url,
            description,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

#[derive(Debug, Default)]
pub struct FormController {
    mode: Option<FormMode>,
    fields: FormFields,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a blank form; the category defaults to the first one available
    pub fn open_create(&mut self, categories: &CategoryService) {
        self.mode = Some(FormMode::Create);
        self.fields = FormFields {
            category_id: categories.first_id().unwrap_or_default().to_string(),
            ..FormFields::default()
        };
    }

    /// Open a form pre-filled with the record's current values
    pub fn open_edit(&mut self, record: &FileRecord) {
        self.mode = Some(FormMode::Edit(record.id));
        self.fields = FormFields::from_record(record);
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.mode
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    /// Id of the record being edited, if any
    pub fn editing(&self) -> Option<Uuid> {
        match self.mode {
            Some(FormMode::Edit(id)) => Some(id),
            _ => None,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn set_fields(&mut self, fields: FormFields) {
        self.fields = fields;
    }

    /// Clear values and the editing reference
    pub fn close(&mut self) {
        self.mode = None;
        self.fields = FormFields::default();
    }

    /// Commit the form into the store.
    ///
    /// Create prepends a new record with a fresh id, equal timestamps, a
    /// synthetic size and `is_pinned = false`. Edit merges the fields into
    /// the existing record and refreshes `updated_at`.
    pub fn submit(
        &mut self,
        store: &mut RecordStore,
        now: DateTime<Utc>,
    ) -> Result<FileRecord, FormError> {
        let mode = self.mode.ok_or(FormError::NotOpen)?;
        let changes = self.fields.validated()?;

        let record = match mode {
            FormMode::Create => store.insert_front(new_record(changes, now))?.clone(),
            FormMode::Edit(id) => store.update(id, changes, now)?.clone(),
        };

        self.close();
        Ok(record)
    }
}

fn new_record(changes: FileRecordChanges, now: DateTime<Utc>) -> FileRecord {
    FileRecord {
        id: Uuid::now_v7(),
        name: changes.name,
        category_id: changes.category_id,
        spreadsheet_url: changes.spreadsheet_url,
        created_at: now,
        updated_at: now,
        file_size: Some(synthetic_file_size()),
        description: changes.description,
        is_pinned: false,
    }
}

/// Pseudo-random size within the synthetic range, drawn from a v4 UUID
fn synthetic_file_size() -> u64 {
    let span = SYNTHETIC_FILE_SIZE_MAX - SYNTHETIC_FILE_SIZE_MIN + 1;
    let random = Uuid::new_v4().as_u128() as u64;
    SYNTHETIC_FILE_SIZE_MIN + random % span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::projection::{project, ProjectionQuery};
    use crate::features::categories::models::Category;
    use chrono::Duration;

    fn categories() -> CategoryService {
        CategoryService::new(vec![
            Category::new("fin", "Finance"),
            Category::new("ops", "Operations"),
        ])
    }

    fn budget_fields() -> FormFields {
        FormFields {
            name: "Budget 2025".to_string(),
            category_id: "fin".to_string(),
            spreadsheet_url: "https://example.com/sheet".to_string(),
            description: String::new(),
        }
    }

    fn seeded_store() -> RecordStore {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        for name in ["Payroll", "Roster"] {
            form.open_create(&categories());
            form.set_fields(FormFields {
                name: name.to_string(),
                ..budget_fields()
            });
            form.submit(&mut store, Utc::now() - Duration::days(1)).unwrap();
        }
        store
    }

    #[test]
    fn test_open_create_defaults_to_first_category() {
        let mut form = FormController::new();
        form.open_create(&categories());

        assert_eq!(form.mode(), Some(FormMode::Create));
        assert_eq!(form.fields().category_id, "fin");
        assert!(form.fields().name.is_empty());
        assert!(form.fields().spreadsheet_url.is_empty());
        assert!(form.fields().description.is_empty());
    }

    #[test]
    fn test_open_create_resets_previous_values() {
        let mut form = FormController::new();
        form.open_create(&categories());
        form.set_fields(budget_fields());

        form.open_create(&categories());
        assert!(form.fields().name.is_empty());
    }

    #[test]
    fn test_open_create_without_categories() {
        let mut form = FormController::new();
        form.open_create(&CategoryService::default());
        assert_eq!(form.fields().category_id, "");
    }

    #[test]
    fn test_create_yields_fresh_unpinned_record_at_front() {
        let mut store = seeded_store();
        let mut form = FormController::new();
        let now = Utc::now();

        form.open_create(&categories());
        form.set_fields(budget_fields());
        let created = form.submit(&mut store, now).unwrap();

        assert!(!created.is_pinned);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(created.created_at, now);
        assert_eq!(created.description, None);
        assert_eq!(created.category_id.as_deref(), Some("fin"));
        assert_eq!(store.records()[0].id, created.id);
        assert!(!form.is_open());

        let size = created.file_size.unwrap();
        assert!((SYNTHETIC_FILE_SIZE_MIN..=SYNTHETIC_FILE_SIZE_MAX).contains(&size));

        let projection = project(store.records(), &categories(), &ProjectionQuery::default());
        assert!(projection.primary.is_empty());
        assert!(projection.secondary.iter().any(|r| r.id == created.id));
    }

    #[test]
    fn test_back_to_back_creates_get_distinct_ids() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        let now = Utc::now();

        form.open_create(&categories());
        form.set_fields(budget_fields());
        let first = form.submit(&mut store, now).unwrap();

        form.open_create(&categories());
        form.set_fields(budget_fields());
        let second = form.submit(&mut store, now).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_open_edit_copies_record_values() {
        let store = seeded_store();
        let record = &store.records()[0];
        let mut form = FormController::new();

        form.open_edit(record);

        assert_eq!(form.editing(), Some(record.id));
        assert_eq!(form.fields().name, record.name);
        assert_eq!(form.fields().category_id, "fin");
    }

    #[test]
    fn test_edit_category_changes_only_category_and_updated_at() {
        let mut store = seeded_store();
        let before = store.records()[1].clone();
        let now = Utc::now();
        let mut form = FormController::new();

        form.open_edit(&before);
        let mut fields = form.fields().clone();
        fields.category_id = "ops".to_string();
        form.set_fields(fields);
        let after = form.submit(&mut store, now).unwrap();

        assert_eq!(after.category_id.as_deref(), Some("ops"));
        assert_eq!(after.updated_at, now);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.is_pinned, before.is_pinned);
        assert_eq!(after.name, before.name);
        assert_eq!(after.spreadsheet_url, before.spreadsheet_url);
        assert_eq!(after.file_size, before.file_size);
        assert_eq!(form.editing(), None);
    }

    #[test]
    fn test_required_fields() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        form.open_create(&categories());

        let blank_name = FormFields {
            name: "  ".to_string(),
            ..budget_fields()
        };
        let blank_category = FormFields {
            category_id: String::new(),
            ..budget_fields()
        };
        let blank_url = FormFields {
            spreadsheet_url: String::new(),
            ..budget_fields()
        };

        for (field, fields) in [
            ("name", blank_name),
            ("category_id", blank_category),
            ("spreadsheet_url", blank_url),
        ] {
            form.set_fields(fields);
            let err = form.submit(&mut store, Utc::now()).unwrap_err();
            assert!(matches!(err, FormError::MissingField(f) if f == field));
        }

        assert!(store.is_empty());
        assert!(form.is_open());
    }

    #[test]
    fn test_url_must_be_url_shaped() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        form.open_create(&categories());
        form.set_fields(FormFields {
            spreadsheet_url: "not a url".to_string(),
            ..budget_fields()
        });

        let err = form.submit(&mut store, Utc::now()).unwrap_err();
        assert!(matches!(err, FormError::InvalidUrl(_)));
        assert_eq!(form.fields().spreadsheet_url, "not a url");
    }

    #[test]
    fn test_submit_without_open_form() {
        let mut store = RecordStore::new();
        let mut form = FormController::new();
        form.set_fields(budget_fields());

        assert!(matches!(
            form.submit(&mut store, Utc::now()),
            Err(FormError::NotOpen)
        ));
    }

    #[test]
    fn test_edit_of_deleted_record_fails() {
        let mut store = seeded_store();
        let record = store.records()[0].clone();
        let mut form = FormController::new();
        form.open_edit(&record);

        store.delete(record.id, |_: &FileRecord| true).unwrap();

        let err = form.submit(&mut store, Utc::now()).unwrap_err();
        assert!(matches!(err, FormError::Store(StoreError::NotFound(id)) if id == record.id));
    }

    #[test]
    fn test_close_clears_everything() {
        let store = seeded_store();
        let mut form = FormController::new();
        form.open_edit(&store.records()[0]);

        form.close();

        assert!(!form.is_open());
        assert_eq!(form.editing(), None);
        assert_eq!(form.fields(), &FormFields::default());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spreadsheet link held in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub name: String,
    /// Key into the category list; absent or unknown ids display as "Uncategorized"
    #[serde(default)]
    pub category_id: Option<String>,
    pub spreadsheet_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Synthetic byte count, not a measurement of the linked sheet
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
}

/// Editable fields merged into an existing record on edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecordChanges {
    pub name: String,
    pub category_id: Option<String>,
    pub spreadsheet_url: String,
    pub description: Option<String>,
}

impl FileRecord {
    /// Refresh `updated_at`, never moving it before `created_at`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    pub fn apply(&mut self, changes: FileRecordChanges, now: DateTime<Utc>) {
        self.name = changes.name;
        self.category_id = changes.category_id;
        self.spreadsheet_url = changes.spreadsheet_url;
        self.description = changes.description;
        self.touch(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(created_at: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id: Uuid::now_v7(),
            name: "Budget".to_string(),
            category_id: Some("fin".to_string()),
            spreadsheet_url: "https://example.com/budget".to_string(),
            created_at,
            updated_at: created_at,
            file_size: None,
            description: None,
            is_pinned: false,
        }
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let created = Utc::now();
        let mut r = record(created);

        r.touch(created - Duration::hours(1));
        assert_eq!(r.updated_at, created);

        r.touch(created + Duration::minutes(5));
        assert_eq!(r.updated_at, created + Duration::minutes(5));
    }

    #[test]
    fn test_seed_json_defaults() {
        let json = r#"{
            "id": "0190a6c4-7e3f-7b4a-9c2d-1f2e3d4c5b6a",
            "name": "Payroll",
            "spreadsheet_url": "https://example.com/payroll",
            "created_at": "2024-01-02T03:04:05Z",
            "updated_at": "2024-01-03T03:04:05Z"
        }"#;

        let r: FileRecord = serde_json::from_str(json).unwrap();
        assert!(!r.is_pinned);
        assert_eq!(r.category_id, None);
        assert_eq!(r.description, None);
        assert!(r.updated_at > r.created_at);
    }
}

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - can create, edit, delete and pin catalog records
pub const ROLE_ADMIN: &str = "admin";

/// Viewer role - read-only access to the catalog
#[allow(dead_code)]
pub const ROLE_VIEWER: &str = "viewer";

// =============================================================================
// CATALOG CONSTANTS
// =============================================================================

/// Display name for records whose category is absent or unknown
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Lower bound of the synthetic file size assigned on creation (10 KiB)
pub const SYNTHETIC_FILE_SIZE_MIN: u64 = 10 * 1024;

/// Upper bound of the synthetic file size assigned on creation (5 MiB)
pub const SYNTHETIC_FILE_SIZE_MAX: u64 = 5 * 1024 * 1024;

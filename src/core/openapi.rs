use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::catalog::{dtos as catalog_dtos, handlers as catalog_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Categories
        categories_handlers::list_categories,
        // Catalog
        catalog_handlers::list_files,
        catalog_handlers::get_file,
        catalog_handlers::open_file,
        catalog_handlers::create_draft,
        catalog_handlers::edit_draft,
        catalog_handlers::create_file,
        catalog_handlers::update_file,
        catalog_handlers::delete_file,
        catalog_handlers::toggle_pin,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dto::MeResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Catalog
            catalog_dtos::FileRecordResponseDto,
            catalog_dtos::LayoutDto,
            catalog_dtos::PartitionDto,
            catalog_dtos::CatalogViewDto,
            catalog_dtos::FileFormDto,
            catalog_dtos::FormModeDto,
            catalog_dtos::FormDraftDto,
            catalog_dtos::DeleteFileResponseDto,
            ApiResponse<catalog_dtos::CatalogViewDto>,
            ApiResponse<catalog_dtos::FileRecordResponseDto>,
            ApiResponse<catalog_dtos::FormDraftDto>,
            ApiResponse<catalog_dtos::DeleteFileResponseDto>,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Current user"),
        (name = "categories", description = "Category list"),
        (name = "catalog", description = "Spreadsheet catalog records")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Fills the document info from configuration
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/catalog/files"));
        assert!(doc.paths.paths.contains_key("/api/catalog/files/{id}/pin"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Catalog".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Catalog");
        assert_eq!(doc.info.version, "9.9.9");
    }
}

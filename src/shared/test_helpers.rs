#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;
#[cfg(test)]
use crate::shared::constants::{ROLE_ADMIN, ROLE_VIEWER};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-admin-account".to_string(),
        sub: "test-admin".to_string(),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

#[cfg(test)]
pub fn create_viewer_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-viewer-account".to_string(),
        sub: "test-viewer".to_string(),
        roles: vec![ROLE_VIEWER.to_string()],
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
async fn inject_viewer_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_viewer_user());
    next.run(request).await
}

/// Wrap a router so every request is made by an admin
#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// Wrap a router so every request is made by a read-only viewer
#[cfg(test)]
pub fn with_viewer_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_viewer_middleware))
}

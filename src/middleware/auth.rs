use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{authorize, Guard, Identity, IdentityExtractor, RouteContext};
use crate::error::ApiError;

/// Per-request identity slot, filled by `authenticate` for every request
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<Identity>);

/// Decode the bearer token, if any, into the request's `CurrentUser`.
///
/// Never rejects: anonymous and garbled credentials both leave the slot empty.
pub async fn authenticate(
    State(extractor): State<IdentityExtractor>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = extractor.extract_from_headers(request.headers());
    if let Some(user) = &identity {
        tracing::debug!("Authenticated {} (admin: {})", user.username, user.is_admin);
    }
    request.extensions_mut().insert(CurrentUser(identity));

    next.run(request).await
}

/// Require any logged-in user
pub async fn ensure_logged_in(request: Request, next: Next) -> Result<Response, ApiError> {
    enforce(&[Guard::RequireIdentity], RouteContext::default(), request, next).await
}

/// Require an admin
pub async fn ensure_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    enforce(&[Guard::RequireAdmin], RouteContext::default(), request, next).await
}

/// Require an admin or the user named by the `:username` path parameter
pub async fn ensure_correct_user_or_admin(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let route = RouteContext::from_params(&params);
    enforce(&[Guard::RequireSelfOrAdmin], route, request, next).await
}

async fn enforce(
    guards: &[Guard],
    route: RouteContext,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<CurrentUser>()
        .and_then(|current| current.0.as_ref());

    if let Err(e) = authorize(guards, identity, &route) {
        tracing::warn!(
            "Denied {} {}: {}",
            request.method(),
            request.uri().path(),
            e
        );
        return Err(e.into());
    }

    Ok(next.run(request).await)
}

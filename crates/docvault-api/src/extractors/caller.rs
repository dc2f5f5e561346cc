//! `Caller` extractor: the optional caller identity from `X-User-Id`.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use docvault_service::context::RequestContext;

/// Header carrying the caller identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Request context built from the incoming headers. Never rejects: a missing
/// or non-UTF-8 header yields an anonymous caller.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl std::ops::Deref for Caller {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string());
        Ok(Self(RequestContext::new(user_id)))
    }
}

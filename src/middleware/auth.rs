use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::models::auth::CallContext;

/// Call metadata is taken from the request headers. A missing token is not a
/// rejection here; operations that need one answer `Unauthenticated` themselves.
impl<S> FromRequestParts<S> for CallContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .headers
            .iter()
            .fold(CallContext::new(), |ctx, (name, value)| match value.to_str() {
                Ok(v) => ctx.with(name.as_str(), v),
                Err(_) => ctx,
            });
        Ok(ctx)
    }
}

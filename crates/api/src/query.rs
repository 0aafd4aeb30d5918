//! Query-string extraction for API handlers.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use trackstat_core::error::CoreError;

use crate::error::AppError;

/// Drop-in replacement for [`Query`] whose rejections are reported as
/// validation errors (422 JSON) rather than axum's plain-text 400.
///
/// Covers non-numeric values for numeric fields and unknown enum values
/// such as `?sort=popularity`. Range checks happen afterwards, when the
/// handler resolves the parameters through `trackstat_core`.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::try_from_uri(&parts.uri)
            .map_err(|rejection| CoreError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

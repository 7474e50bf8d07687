//! Request extractors.

use super::error::ApiError;
use crate::{core::locale::Locale, errors::Error};
use axum::{extract::FromRequestParts, http::request::Parts};

/// Locale from the first path segment (`/{locale}/plataforma-parceiro/...`).
///
/// Unknown tags are rejected with a 404 in the default locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLocale(pub Locale);

impl<S> FromRequestParts<S> for PathLocale
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tag = parts
            .uri
            .path()
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();

        tag.parse::<Locale>()
            .map(PathLocale)
            .map_err(|e| ApiError::new(e, Locale::default()))
    }
}

/// Shorthand for mapping a crate error into the request's locale.
pub trait Localize<T> {
    /// Attaches `locale` to the error side.
    fn localize(self, locale: Locale) -> Result<T, ApiError>;
}

impl<T> Localize<T> for Result<T, Error> {
    fn localize(self, locale: Locale) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(e, locale))
    }
}

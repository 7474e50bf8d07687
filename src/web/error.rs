//! HTTP error responses.
//!
//! Every [`Error`] maps to a status code, a stable machine-readable code, and
//! a short message in the request locale. Internal details stay in the logs.

use crate::{core::locale::Locale, errors::Error};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// An [`Error`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    /// The underlying failure
    pub error: Error,
    /// Locale of the request that failed
    pub locale: Locale,
}

impl ApiError {
    /// Wraps an error for a request in `locale`.
    #[must_use]
    pub const fn new(error: Error, locale: Locale) -> Self {
        Self { error, locale }
    }

    /// Status code and stable error code for the wrapped error.
    #[must_use]
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match &self.error {
            Error::Validation { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            Error::PartnerNotFound { .. } | Error::LeadNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Error::UnsupportedLocale { .. } => (StatusCode::NOT_FOUND, "unsupported_locale"),
            Error::ChallengeUnavailable { .. } => (StatusCode::CONFLICT, "challenge_unavailable"),
            Error::ChallengeNotCompleted { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "challenge_not_completed"),
            Error::BonusAlreadyClaimed { .. } => (StatusCode::CONFLICT, "bonus_already_claimed"),
            Error::Notification { .. } => (StatusCode::BAD_GATEWAY, "notification_failed"),
            Error::Config { .. }
            | Error::Database(_)
            | Error::Io(_)
            | Error::EnvVar(_)
            | Error::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    fn message(&self) -> String {
        let pt = matches!(self.locale, Locale::PtBr);
        match &self.error {
            Error::Validation { field, .. } if pt => format!("Campo inválido: {field}."),
            Error::Validation { field, .. } => format!("Invalid field: {field}."),
            Error::PartnerNotFound { .. } | Error::LeadNotFound { .. } if pt => "Registro não encontrado.".into(),
            Error::PartnerNotFound { .. } | Error::LeadNotFound { .. } => "Record not found.".into(),
            Error::UnsupportedLocale { .. } if pt => "Idioma não suportado.".into(),
            Error::UnsupportedLocale { .. } => "Unsupported language.".into(),
            Error::ChallengeUnavailable { .. } if pt => "Nenhum desafio disponível para esta conta.".into(),
            Error::ChallengeUnavailable { .. } => "No challenge is available for this account.".into(),
            Error::ChallengeNotCompleted { .. } if pt => "A meta do desafio ainda não foi atingida.".into(),
            Error::ChallengeNotCompleted { .. } => "The challenge target has not been reached yet.".into(),
            Error::BonusAlreadyClaimed { .. } if pt => "O bônus já foi resgatado.".into(),
            Error::BonusAlreadyClaimed { .. } => "The bonus has already been redeemed.".into(),
            Error::Notification { .. } if pt => {
                "Não foi possível confirmar o resgate. Tente novamente mais tarde.".into()
            }
            Error::Notification { .. } => "The redemption could not be confirmed. Please try again later.".into(),
            _ if pt => "Ocorreu um erro inesperado.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self.error, code, "request failed");
        } else {
            tracing::debug!(error = %self.error, code, "request rejected");
        }

        let mut body = json!({
            "error": code,
            "message": self.message(),
        });
        if let Error::Validation { field, .. } = &self.error {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}

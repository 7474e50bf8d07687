//! Unified error type for the partner portal.
//!
//! The aggregation functions in [`crate::core`] never fail; everything here
//! comes from storage, configuration, validation of incoming edits, or the
//! notification collaborator.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// All errors produced by the partner portal.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing, unreadable, or invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Storage layer failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing or not unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON encoding failure (notification payloads)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A user-supplied field was rejected
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Field name as seen by the client
        field: String,
        /// Human-readable reason
        message: String,
    },

    /// No partner with this id
    #[error("Partner not found: {id}")]
    PartnerNotFound {
        /// Partner id that was looked up
        id: i64,
    },

    /// No lead with this id, or the lead is not attributed to the caller
    #[error("Lead not found: {id}")]
    LeadNotFound {
        /// Lead id that was looked up
        id: i64,
    },

    /// Path locale is not one of the supported tags
    #[error("Unsupported locale: {tag}")]
    UnsupportedLocale {
        /// The tag as it appeared in the request
        tag: String,
    },

    /// The partner has no registration date, so no challenge exists
    #[error("No bonus challenge is available for partner {partner_id}")]
    ChallengeUnavailable {
        /// Partner id
        partner_id: i64,
    },

    /// Redeem attempted before reaching the target
    #[error("Challenge target not reached: {current:.2} of {target:.2}")]
    ChallengeNotCompleted {
        /// Qualifying commission so far
        current: f64,
        /// Target commission
        target: f64,
    },

    /// The bonus was already redeemed
    #[error("Bonus already claimed at {claimed_at}")]
    BonusAlreadyClaimed {
        /// When the earlier redemption was recorded
        claimed_at: DateTime<Utc>,
    },

    /// The notification collaborator reported a failure
    #[error("Notification dispatch failed: {message}")]
    Notification {
        /// Failure detail from the collaborator
        message: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

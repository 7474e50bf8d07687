//! Notification entity - Outbox of events handed to the email trigger.
//! Rows are written once and picked up by the mailer outside this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification outbox model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Event type tag (e.g., `"bonus_redeemed"`)
    pub event_type: String,
    /// JSON-encoded event payload
    pub payload: String,
    /// When the event was queued
    pub created_at: DateTimeUtc,
}

/// Notifications have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

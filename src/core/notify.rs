//! Outbound notifications.
//!
//! The email trigger lives outside this crate. [`OutboxNotifier`] hands it
//! events by writing them to the `notifications` table; the mailer picks them
//! up from there. Failures are reported to the caller and never retried here.

use crate::{
    entities::notification,
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;

/// Payload of a bonus redemption.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusRedemption {
    /// Partner who redeemed
    pub partner_id: i64,
    /// Partner display name
    pub partner_name: String,
    /// Where the confirmation goes
    pub partner_email: String,
    /// Qualifying commission at redemption time
    pub commission: f64,
    /// Challenge target
    pub target: f64,
    /// When the redemption happened
    pub redeemed_at: DateTime<Utc>,
}

/// Events the portal can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// A partner completed the challenge and claimed the bonus
    BonusRedeemed(BonusRedemption),
}

impl NotificationEvent {
    /// Event type tag understood by the mailer.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::BonusRedeemed(_) => "bonus_redeemed",
        }
    }

    /// JSON payload for the mailer.
    pub fn payload_json(&self) -> Result<String> {
        match self {
            Self::BonusRedeemed(redemption) => Ok(serde_json::to_string(redemption)?),
        }
    }

    /// When the event happened.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::BonusRedeemed(redemption) => redemption.redeemed_at,
        }
    }
}

/// Fire-and-forget notification dispatch.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Hands the event to the delivery channel.
    async fn send(&self, event: &NotificationEvent) -> Result<()>;
}

/// Writes events to the `notifications` outbox table.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    db: DatabaseConnection,
}

impl OutboxNotifier {
    /// Creates a notifier writing to `db`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn send(&self, event: &NotificationEvent) -> Result<()> {
        let row = notification::ActiveModel {
            event_type: Set(event.event_type().to_string()),
            payload: Set(event.payload_json()?),
            created_at: Set(event.occurred_at()),
            ..Default::default()
        };

        let row = row.insert(&self.db).await.map_err(|e| Error::Notification {
            message: e.to_string(),
        })?;

        tracing::info!(
            notification_id = row.id,
            event_type = %row.event_type,
            "notification queued"
        );
        Ok(())
    }
}

/// Every queued notification, oldest first.
pub async fn queued_notifications(db: &DatabaseConnection) -> Result<Vec<notification::Model>> {
    crate::entities::Notification::find()
        .order_by_asc(notification::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

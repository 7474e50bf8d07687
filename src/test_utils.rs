//! Shared test utilities for the partner portal.
//!
//! This module provides common helper functions for setting up test databases,
//! building in-memory fixtures, and stand-in notifiers.

use crate::{
    core::{
        contracts::{ContractRecord, NewContract},
        leads::NewLead,
        notify::{NotificationEvent, Notifier},
        partners::NewPartner,
        referral::PartnerCode,
        status::LeadSource,
    },
    entities::{contract, lead},
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all storage tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a UTC timestamp.
#[allow(clippy::unwrap_used)]
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .unwrap()
}

fn email_for(name: &str) -> String {
    format!("{}@example.com", name.trim().to_lowercase().replace(' ', "."))
}

/// In-memory lead attributed to partner 42, captured on 2024-01-01.
///
/// The email is derived from the name: `"Ana Souza"` gets
/// `ana.souza@example.com`.
pub fn lead_fixture(id: i64, name: &str, status: &str) -> lead::Model {
    let captured = utc(2024, 1, 1, 0, 0, 0);
    lead::Model {
        id,
        name: name.to_string(),
        email: email_for(name),
        phone: None,
        message: None,
        source: "referral".to_string(),
        partner_code: Some("42".to_string()),
        status: status.to_string(),
        created_at: captured,
        updated_at: captured,
        contacted_at: None,
    }
}

/// Stores a lead row with `partner_code` written verbatim, the way an external
/// form backend might, bypassing the canonical form `record_lead` writes.
pub async fn insert_raw_lead(
    db: &DatabaseConnection,
    name: &str,
    partner_code: &str,
    created_at: DateTime<Utc>,
) -> Result<lead::Model> {
    let lead = lead::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email_for(name)),
        phone: Set(None),
        message: Set(None),
        source: Set("referral".to_string()),
        partner_code: Set(Some(partner_code.to_string())),
        status: Set("new".to_string()),
        created_at: Set(created_at),
        updated_at: Set(created_at),
        contacted_at: Set(None),
        ..Default::default()
    };
    Ok(lead.insert(db).await?)
}

/// In-memory contract with the given amounts.
pub fn contract_fixture(
    id: i64,
    total_value: f64,
    commission_percentage: Option<f64>,
    amount_paid: f64,
) -> contract::Model {
    contract::Model {
        id,
        contract_number: format!("CT-2024-{id:03}"),
        title: format!("Project {id}"),
        total_value,
        commission_percentage,
        amount_paid,
        status: "active".to_string(),
        signed_at: None,
        lead_id: id,
        created_at: utc(2024, 1, 15, 0, 0, 0),
    }
}

/// Unpaid contract joined with a lead captured at `lead_created_at`.
pub fn contract_record(
    id: i64,
    total_value: f64,
    commission_percentage: Option<f64>,
    lead_created_at: DateTime<Utc>,
) -> ContractRecord {
    let mut lead = lead_fixture(id, &format!("Client {id}"), "closed");
    lead.created_at = lead_created_at;
    lead.updated_at = lead_created_at;

    ContractRecord {
        contract: contract_fixture(id, total_value, commission_percentage, 0.0),
        lead: Some(lead),
    }
}

/// Form input for a lead. Referral source when a code is given.
pub fn new_lead(name: &str, partner_code: Option<PartnerCode>) -> NewLead {
    NewLead {
        name: name.to_string(),
        email: email_for(name),
        phone: None,
        message: None,
        source: if partner_code.is_some() {
            LeadSource::Referral
        } else {
            LeadSource::Website
        },
        partner_code,
    }
}

/// Registration input for a partner.
pub fn new_partner(name: &str, code: Option<i64>) -> NewPartner {
    NewPartner {
        name: name.to_string(),
        email: email_for(name),
        phone: None,
        code,
    }
}

/// Unpaid, unsigned contract for `lead_id`.
pub fn new_contract(lead_id: i64, total_value: f64, commission_percentage: Option<f64>) -> NewContract {
    NewContract {
        contract_number: format!("CT-{lead_id:04}"),
        title: "Custom software".to_string(),
        total_value,
        commission_percentage,
        amount_paid: 0.0,
        signed_at: None,
        lead_id,
    }
}

/// Notifier that keeps every event it is given.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    /// Events sent so far.
    #[allow(clippy::unwrap_used)]
    pub fn sent(&self) -> Vec<NotificationEvent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    #[allow(clippy::unwrap_used)]
    async fn send(&self, event: &NotificationEvent) -> Result<()> {
        self.sent.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Notifier whose delivery channel is always down.
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _event: &NotificationEvent) -> Result<()> {
        Err(Error::Notification {
            message: "mail relay unavailable".to_string(),
        })
    }
}

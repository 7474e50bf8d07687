//! Lead storage operations.
//!
//! Leads arrive from the public contact and referral forms and are only ever
//! read and updated afterwards; there is no delete.

use crate::{
    core::{
        referral::PartnerCode,
        status::{LeadSource, LeadStatus},
    },
    entities::{Lead, lead},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// A lead as submitted through a form.
#[derive(Debug, Clone)]
pub struct NewLead {
    /// Contact name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Message left with the form
    pub message: Option<String>,
    /// Which form captured the lead
    pub source: LeadSource,
    /// Referring partner, from the `?ref=` parameter
    pub partner_code: Option<PartnerCode>,
}

/// Stores a freshly captured lead with status `new`.
///
/// The partner code is written in canonical decimal form.
pub async fn record_lead(
    db: &DatabaseConnection,
    new_lead: NewLead,
    now: DateTime<Utc>,
) -> Result<lead::Model> {
    let name = new_lead.name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Lead name cannot be empty"));
    }
    let email = new_lead.email.trim();
    if !email.contains('@') {
        return Err(Error::validation("email", "Lead email must contain '@'"));
    }

    let lead = lead::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        phone: Set(new_lead.phone),
        message: Set(new_lead.message),
        source: Set(new_lead.source.as_str().to_string()),
        partner_code: Set(new_lead.partner_code.map(|code| code.to_string())),
        status: Set(LeadStatus::New.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        contacted_at: Set(None),
        ..Default::default()
    };

    let lead = lead.insert(db).await?;
    tracing::info!(lead_id = lead.id, source = %lead.source, "lead recorded");
    Ok(lead)
}

/// All leads attributed to a partner, newest first.
///
/// Attribution uses [`PartnerCode::matches`], the same rule as
/// [`mark_lead_contacted`], so rows written elsewhere as `"042"` or `" 42"`
/// still belong to partner 42.
pub async fn get_leads_for_partner(
    db: &DatabaseConnection,
    code: PartnerCode,
) -> Result<Vec<lead::Model>> {
    let leads = Lead::find()
        .filter(lead::Column::PartnerCode.is_not_null())
        .order_by_desc(lead::Column::CreatedAt)
        .order_by_desc(lead::Column::Id)
        .all(db)
        .await?;

    Ok(leads
        .into_iter()
        .filter(|lead| code.matches(lead.partner_code.as_deref()))
        .collect())
}

/// Finds a lead by id.
pub async fn get_lead_by_id(db: &DatabaseConnection, lead_id: i64) -> Result<Option<lead::Model>> {
    Lead::find_by_id(lead_id).one(db).await.map_err(Into::into)
}

/// Records that the partner contacted one of their leads just now.
///
/// Leads attributed to someone else are reported as not found.
pub async fn mark_lead_contacted(
    db: &DatabaseConnection,
    code: PartnerCode,
    lead_id: i64,
    now: DateTime<Utc>,
) -> Result<lead::Model> {
    let lead = get_lead_by_id(db, lead_id)
        .await?
        .filter(|lead| code.matches(lead.partner_code.as_deref()))
        .ok_or(Error::LeadNotFound { id: lead_id })?;

    let mut active_model: lead::ActiveModel = lead.into();
    active_model.contacted_at = Set(Some(now));
    active_model.updated_at = Set(now);
    let updated = active_model.update(db).await?;

    tracing::info!(lead_id, partner_code = %code, "lead marked as contacted");
    Ok(updated)
}

/// Moves a lead to another pipeline status.
pub async fn update_lead_status(
    db: &DatabaseConnection,
    lead_id: i64,
    status: LeadStatus,
    now: DateTime<Utc>,
) -> Result<lead::Model> {
    let lead = get_lead_by_id(db, lead_id)
        .await?
        .ok_or(Error::LeadNotFound { id: lead_id })?;

    let mut active_model: lead::ActiveModel = lead.into();
    active_model.status = Set(status.as_str().to_string());
    active_model.updated_at = Set(now);
    let updated = active_model.update(db).await?;

    tracing::info!(lead_id, %status, "lead status updated");
    Ok(updated)
}

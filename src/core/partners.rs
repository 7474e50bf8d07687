//! Partner profile storage operations.

use crate::{
    entities::{Partner, partner},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, prelude::*, sea_query::Expr};
use serde::Deserialize;

/// Data needed to register a partner.
#[derive(Debug, Clone)]
pub struct NewPartner {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Referral code, if already provisioned
    pub code: Option<i64>,
}

/// Editable profile fields, as sent by the profile form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Display name, must not be blank
    pub name: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// PIX key
    #[serde(default)]
    pub pix_key: Option<String>,
    /// Bank name
    #[serde(default)]
    pub bank_name: Option<String>,
    /// Bank agency
    #[serde(default)]
    pub bank_agency: Option<String>,
    /// Bank account
    #[serde(default)]
    pub bank_account: Option<String>,
}

/// Registers a partner with status `active`.
pub async fn create_partner(
    db: &DatabaseConnection,
    new_partner: NewPartner,
    now: DateTime<Utc>,
) -> Result<partner::Model> {
    let name = new_partner.name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Partner name cannot be empty"));
    }
    if new_partner.code.is_some_and(|code| code < 0) {
        return Err(Error::validation("code", "Referral code cannot be negative"));
    }

    let partner = partner::ActiveModel {
        name: Set(name.to_string()),
        email: Set(new_partner.email.trim().to_string()),
        phone: Set(blank_to_none(new_partner.phone)),
        code: Set(new_partner.code),
        created_at: Set(Some(now)),
        pix_key: Set(None),
        bank_name: Set(None),
        bank_agency: Set(None),
        bank_account: Set(None),
        status: Set("active".to_string()),
        bonus_claimed_at: Set(None),
        ..Default::default()
    };

    let partner = partner.insert(db).await?;
    tracing::info!(partner_id = partner.id, code = ?partner.code, "partner registered");
    Ok(partner)
}

/// Finds a partner by id.
pub async fn get_partner_by_id(
    db: &DatabaseConnection,
    partner_id: i64,
) -> Result<Option<partner::Model>> {
    Partner::find_by_id(partner_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Saves profile edits. Blank optional fields are cleared.
pub async fn update_profile(
    db: &DatabaseConnection,
    partner_id: i64,
    update: ProfileUpdate,
) -> Result<partner::Model> {
    let name = update.name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Partner name cannot be empty"));
    }

    let partner = get_partner_by_id(db, partner_id)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;

    let mut active_model: partner::ActiveModel = partner.into();
    active_model.name = Set(name.to_string());
    active_model.phone = Set(blank_to_none(update.phone));
    active_model.pix_key = Set(blank_to_none(update.pix_key));
    active_model.bank_name = Set(blank_to_none(update.bank_name));
    active_model.bank_agency = Set(blank_to_none(update.bank_agency));
    active_model.bank_account = Set(blank_to_none(update.bank_account));
    let updated = active_model.update(db).await?;

    tracing::info!(partner_id, "partner profile updated");
    Ok(updated)
}

/// Atomically claims the challenge bonus for a partner.
///
/// Runs `UPDATE partners SET bonus_claimed_at = now WHERE id = ? AND
/// bonus_claimed_at IS NULL`, so of two concurrent claims only one wins.
/// Returns whether this call made the claim.
pub async fn claim_bonus<C>(db: &C, partner_id: i64, now: DateTime<Utc>) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Partner::update_many()
        .col_expr(partner::Column::BonusClaimedAt, Expr::value(now))
        .filter(partner::Column::Id.eq(partner_id))
        .filter(partner::Column::BonusClaimedAt.is_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Undoes a claim whose notification could not be dispatched.
pub async fn release_bonus_claim<C>(db: &C, partner_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Partner::update_many()
        .col_expr(
            partner::Column::BonusClaimedAt,
            Expr::value(Option::<DateTime<Utc>>::None),
        )
        .filter(partner::Column::Id.eq(partner_id))
        .exec(db)
        .await?;

    tracing::warn!(partner_id, "bonus claim released");
    Ok(())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

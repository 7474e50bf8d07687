//! Contract storage operations.
//!
//! Contracts are read together with the lead they came from: the challenge
//! needs the lead's capture date, and the join to the partner goes through
//! the lead's referral code.

use crate::{
    core::referral::PartnerCode,
    entities::{Contract, Lead, contract, lead},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// A contract with its originating lead.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractRecord {
    /// The contract
    pub contract: contract::Model,
    /// The lead it came from; None only if the lead row is missing
    pub lead: Option<lead::Model>,
}

/// Data needed to register a signed contract.
#[derive(Debug, Clone)]
pub struct NewContract {
    /// Human-facing number
    pub contract_number: String,
    /// Short description
    pub title: String,
    /// Total value
    pub total_value: f64,
    /// Partner commission percentage; None means the default
    pub commission_percentage: Option<f64>,
    /// Amount already paid
    pub amount_paid: f64,
    /// Signature date
    pub signed_at: Option<DateTime<Utc>>,
    /// Originating lead
    pub lead_id: i64,
}

/// Registers a contract for an existing lead.
pub async fn create_contract(
    db: &DatabaseConnection,
    new_contract: NewContract,
    now: DateTime<Utc>,
) -> Result<contract::Model> {
    if new_contract.contract_number.trim().is_empty() {
        return Err(Error::validation("contractNumber", "Contract number cannot be empty"));
    }
    validate_amount("totalValue", new_contract.total_value)?;
    validate_amount("amountPaid", new_contract.amount_paid)?;
    if let Some(percentage) = new_contract.commission_percentage {
        validate_amount("commissionPercentage", percentage)?;
    }

    Lead::find_by_id(new_contract.lead_id)
        .one(db)
        .await?
        .ok_or(Error::LeadNotFound {
            id: new_contract.lead_id,
        })?;

    let contract = contract::ActiveModel {
        contract_number: Set(new_contract.contract_number.trim().to_string()),
        title: Set(new_contract.title),
        total_value: Set(new_contract.total_value),
        commission_percentage: Set(new_contract.commission_percentage),
        amount_paid: Set(new_contract.amount_paid),
        status: Set("active".to_string()),
        signed_at: Set(new_contract.signed_at),
        lead_id: Set(new_contract.lead_id),
        created_at: Set(now),
        ..Default::default()
    };

    let contract = contract.insert(db).await?;
    tracing::info!(
        contract_id = contract.id,
        lead_id = contract.lead_id,
        total_value = contract.total_value,
        "contract registered"
    );
    Ok(contract)
}

/// Contracts whose lead is attributed to the partner, newest first.
///
/// Attribution goes through [`PartnerCode::matches`] on the joined lead, as
/// for the partner's lead list.
pub async fn get_contracts_for_partner(
    db: &DatabaseConnection,
    code: PartnerCode,
) -> Result<Vec<ContractRecord>> {
    let rows = Contract::find()
        .find_also_related(Lead)
        .filter(lead::Column::PartnerCode.is_not_null())
        .order_by_desc(contract::Column::CreatedAt)
        .order_by_desc(contract::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter(|(_, lead)| {
            lead.as_ref()
                .is_some_and(|lead| code.matches(lead.partner_code.as_deref()))
        })
        .map(|(contract, lead)| ContractRecord { contract, lead })
        .collect())
}

fn validate_amount(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::validation(field, format!("must be a non-negative number, got {value}")))
    }
}

//! Contract entity - A signed deal that originated from a lead.
//!
//! Commission for the referring partner is derived from `total_value`,
//! `amount_paid` and `commission_percentage`; see [`crate::core::commission`].
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contract database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    /// Unique identifier for the contract
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-facing contract number (e.g., "CT-2024-001")
    pub contract_number: String,
    /// Short description of the engagement
    pub title: String,
    /// Total contract value
    pub total_value: f64,
    /// Commission percentage for the partner, 10 when absent
    pub commission_percentage: Option<f64>,
    /// How much of the contract the client has paid so far
    pub amount_paid: f64,
    /// Contract status as recorded by staff (e.g., "active", "finished")
    pub status: String,
    /// When the contract was signed
    pub signed_at: Option<DateTimeUtc>,
    /// Lead that originated this contract
    pub lead_id: i64,
    /// When the contract record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Contract and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each contract belongs to one lead
    #[sea_orm(
        belongs_to = "super::lead::Entity",
        from = "Column::LeadId",
        to = "super::lead::Column::Id"
    )]
    Lead,
}

impl Related<super::lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lead.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

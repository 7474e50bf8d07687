//! Lead entity - A prospective client captured by the website or a referral.
//!
//! Leads are created by the contact/referral forms and moved through the sales
//! pipeline by staff. `status` and `source` are stored as plain text and read
//! back through [`crate::core::status`], which tolerates unknown values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lead database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    /// Unique identifier for the lead
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Contact name as typed in the form
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone, if given
    pub phone: Option<String>,
    /// Free-form message left with the form
    pub message: Option<String>,
    /// Capture channel: `"website"` or `"referral"`
    pub source: String,
    /// Referral code of the partner this lead is attributed to, as text; compared through `PartnerCode`
    #[sea_orm(indexed)]
    pub partner_code: Option<String>,
    /// Pipeline status, one of the `LeadStatus` tags
    pub status: String,
    /// When the lead was captured
    pub created_at: DateTimeUtc,
    /// When the lead was last modified
    pub updated_at: DateTimeUtc,
    /// Last time the partner or staff contacted the lead
    pub contacted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Lead and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One lead can originate many contracts
    #[sea_orm(has_many = "super::contract::Entity")]
    Contracts,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Partner entity - An external referrer with access to the partner platform.
//!
//! `code` is the numeric referral code used in referral links and as the join
//! key to leads. `created_at` anchors the bonus challenge window and
//! `bonus_claimed_at` records the one-time bonus redemption.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    /// Unique identifier for the partner
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email, also used for bonus notifications
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Numeric referral code, None until the partner is provisioned
    #[sea_orm(unique)]
    pub code: Option<i64>,
    /// Registration date, anchors the challenge window
    pub created_at: Option<DateTimeUtc>,
    /// PIX key for payouts
    pub pix_key: Option<String>,
    /// Bank name for payouts
    pub bank_name: Option<String>,
    /// Bank agency for payouts
    pub bank_agency: Option<String>,
    /// Bank account for payouts
    pub bank_account: Option<String>,
    /// Account status (e.g., "active", "pending")
    pub status: String,
    /// When the challenge bonus was redeemed, None if never
    pub bonus_claimed_at: Option<DateTimeUtc>,
}

/// Defines relationships between Partner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One partner can hold many sessions
    #[sea_orm(has_many = "super::partner_session::Entity")]
    Sessions,
}

impl Related<super::partner_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

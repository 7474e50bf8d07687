//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod contract;
pub mod lead;
pub mod notification;
pub mod partner;
pub mod partner_session;

// Re-export specific types to avoid conflicts
pub use contract::{Column as ContractColumn, Entity as Contract, Model as ContractModel};
pub use lead::{Column as LeadColumn, Entity as Lead, Model as LeadModel};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use partner::{Column as PartnerColumn, Entity as Partner, Model as PartnerModel};
pub use partner_session::{
    Column as PartnerSessionColumn, Entity as PartnerSession, Model as PartnerSessionModel,
};

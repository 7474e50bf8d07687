//! Partner portal business logic.
//!
//! The aggregation modules (`commission`, `stats`, `challenge`, `remarketing`,
//! `referral`, `filter`) are pure. The storage modules take a database
//! connection and hand plain records to them.

/// Bonus redemption
pub mod bonus;
/// Bonus challenge progress and countdown
pub mod challenge;
/// Injectable wall clock
pub mod clock;
/// Commission arithmetic
pub mod commission;
/// Contract storage
pub mod contracts;
/// Live countdown ticker
pub mod countdown;
/// Page view-models
pub mod dashboard;
/// Lead filtering and search
pub mod filter;
/// Lead storage
pub mod leads;
/// Supported locales
pub mod locale;
/// Notification dispatch
pub mod notify;
/// Partner profile storage
pub mod partners;
/// Referral codes and links
pub mod referral;
/// Follow-up eligibility
pub mod remarketing;
/// Partner sessions
pub mod session;
/// Lead statistics
pub mod stats;
/// Lead status and source
pub mod status;

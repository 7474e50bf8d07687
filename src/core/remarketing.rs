//! Flags leads that went cold after the first contact.

use crate::core::status::LeadStatus;
use crate::entities::lead;
use chrono::{DateTime, Utc};

/// Whole days without contact before a lead needs a follow-up.
pub const REMARKETING_AFTER_DAYS: i64 = 30;

/// Whether a lead should be shown with a "needs follow-up" marker.
///
/// Only leads that were contacted and are still in the pipeline
/// (`in_contact`, `qualified`, `proposal_sent`, `negotiating`) qualify, and
/// only once at least [`REMARKETING_AFTER_DAYS`] whole days have passed since
/// `contacted_at`.
#[must_use]
pub fn needs_remarketing(lead: &lead::Model, now: DateTime<Utc>) -> bool {
    if !LeadStatus::from_db(&lead.status).is_awaiting_follow_up() {
        return false;
    }

    lead.contacted_at.is_some_and(|contacted_at| {
        now.signed_duration_since(contacted_at).num_days() >= REMARKETING_AFTER_DAYS
    })
}

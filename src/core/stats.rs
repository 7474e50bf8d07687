//! Lead statistics for the partner dashboard cards.

use crate::core::status::LeadStatus;
use crate::entities::lead;
use serde::Serialize;

/// Counts by pipeline bucket plus the conversion rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    /// Number of leads
    pub total: usize,
    /// Leads with status `closed`
    pub closed: usize,
    /// Leads that are neither closed nor lost
    pub in_progress: usize,
    /// Leads with status `lost`
    pub lost: usize,
    /// `closed / total` as a whole percentage, rounded half up; 0 without leads
    pub conversion_rate: u32,
}

/// Aggregates a lead list in a single pass.
#[must_use]
pub fn compute_lead_stats(leads: &[lead::Model]) -> LeadStats {
    let mut stats = leads.iter().fold(LeadStats::default(), |mut stats, lead| {
        stats.total += 1;
        let status = LeadStatus::from_db(&lead.status);
        if status.is_open() {
            stats.in_progress += 1;
        } else if status == LeadStatus::Closed {
            stats.closed += 1;
        } else {
            stats.lost += 1;
        }
        stats
    });

    stats.conversion_rate = conversion_rate(stats.closed, stats.total);
    stats
}

/// Whole-percentage conversion rate, rounded half up.
#[must_use]
pub fn conversion_rate(closed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }

    // Cast safety: lead counts are far below 2^52 and the result is in [0, 100].
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let rate = (closed as f64 / total as f64 * 100.0).round() as u32;
    rate
}

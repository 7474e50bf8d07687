//! Search and status filtering for the leads page.

use crate::core::status::{LeadStatus, StatusFilter};
use crate::entities::lead;

/// Filters leads by a free-text search and a status selector.
///
/// The search term matches when it is a case-insensitive substring of the
/// lead's name or email, taken as typed, spaces included. An empty or
/// all-whitespace term matches everything. Both conditions must hold. Input
/// order is preserved.
#[must_use]
pub fn filter_leads<'a>(
    leads: &'a [lead::Model],
    search_term: &str,
    status_filter: StatusFilter,
) -> Vec<&'a lead::Model> {
    let needle = if search_term.trim().is_empty() {
        String::new()
    } else {
        search_term.to_lowercase()
    };

    leads
        .iter()
        .filter(|lead| status_filter.accepts(LeadStatus::from_db(&lead.status)))
        .filter(|lead| {
            needle.is_empty()
                || lead.name.to_lowercase().contains(&needle)
                || lead.email.to_lowercase().contains(&needle)
        })
        .collect()
}

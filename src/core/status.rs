//! Lead pipeline status, capture source and the status filter used by the leads page.
//!
//! Statuses are stored as text. Reading them back never fails: anything that
//! is not one of the seven known tags is shown as [`LeadStatus::New`].

use crate::core::locale::Locale;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a lead sits in the sales pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Captured, nobody has talked to them yet
    New,
    /// First contact made
    InContact,
    /// Confirmed as a real opportunity
    Qualified,
    /// A proposal was sent
    ProposalSent,
    /// Terms are being negotiated
    Negotiating,
    /// Won, a contract exists or will
    Closed,
    /// Gave up
    Lost,
}

impl LeadStatus {
    /// Every status in pipeline order.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::InContact,
        Self::Qualified,
        Self::ProposalSent,
        Self::Negotiating,
        Self::Closed,
        Self::Lost,
    ];

    /// The tag stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InContact => "in_contact",
            Self::Qualified => "qualified",
            Self::ProposalSent => "proposal_sent",
            Self::Negotiating => "negotiating",
            Self::Closed => "closed",
            Self::Lost => "lost",
        }
    }

    /// Strict parse of a stored tag.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }

    /// Lenient parse used when reading records: unknown tags become `New`.
    #[must_use]
    pub fn from_db(raw: &str) -> Self {
        Self::parse(raw.trim()).unwrap_or(Self::New)
    }

    /// Still open: neither closed nor lost.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed | Self::Lost)
    }

    /// Contacted at least once but not yet closed or lost.
    #[must_use]
    pub const fn is_awaiting_follow_up(self) -> bool {
        matches!(
            self,
            Self::InContact | Self::Qualified | Self::ProposalSent | Self::Negotiating
        )
    }

    /// Display label for the given locale.
    #[must_use]
    pub const fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::New, Locale::PtBr) => "Novo",
            (Self::New, Locale::En) => "New",
            (Self::InContact, Locale::PtBr) => "Em contato",
            (Self::InContact, Locale::En) => "In contact",
            (Self::Qualified, Locale::PtBr) => "Qualificado",
            (Self::Qualified, Locale::En) => "Qualified",
            (Self::ProposalSent, Locale::PtBr) => "Proposta enviada",
            (Self::ProposalSent, Locale::En) => "Proposal sent",
            (Self::Negotiating, Locale::PtBr) => "Em negociação",
            (Self::Negotiating, Locale::En) => "Negotiating",
            (Self::Closed, Locale::PtBr) => "Fechado",
            (Self::Closed, Locale::En) => "Closed",
            (Self::Lost, Locale::PtBr) => "Perdido",
            (Self::Lost, Locale::En) => "Lost",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.trim())
            .ok_or_else(|| Error::validation("status", format!("unknown lead status '{s}'")))
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel through which a lead was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// Contact form on the public site
    Website,
    /// Referral form or a referral link
    Referral,
}

impl LeadSource {
    /// The tag stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Referral => "referral",
        }
    }

    /// Lenient parse: anything but `referral` counts as the website form.
    #[must_use]
    pub fn from_db(raw: &str) -> Self {
        if raw.trim() == "referral" {
            Self::Referral
        } else {
            Self::Website
        }
    }
}

/// Status selector of the leads page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// No status restriction
    #[default]
    All,
    /// Exactly this status
    Only(LeadStatus),
}

impl StatusFilter {
    /// Whether a lead with `status` passes the filter.
    #[must_use]
    pub fn accepts(self, status: LeadStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

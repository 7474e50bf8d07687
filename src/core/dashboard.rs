//! View-models for the partner pages.
//!
//! Each page fetches its records, then hands plain slices to the pure
//! aggregation functions. The `build_*` functions do no I/O and are what the
//! tests exercise; the async wrappers only add the fetch.

use crate::{
    core::{
        challenge::{ChallengeRules, ChallengeState, evaluate_challenge},
        commission::{CommissionSummary, compute_commission, effective_percentage, format_currency, summarize_commissions},
        contracts::{ContractRecord, get_contracts_for_partner},
        filter::filter_leads,
        leads::get_leads_for_partner,
        locale::Locale,
        referral::{PartnerCode, build_referral_link},
        remarketing::needs_remarketing,
        stats::{LeadStats, compute_lead_stats},
        status::{LeadSource, LeadStatus, StatusFilter},
    },
    entities::{lead, partner},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Request-scoped inputs shared by every view.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Public site origin for referral links
    pub origin: &'a str,
    /// Display locale
    pub locale: Locale,
    /// Wall-clock time of the request
    pub now: DateTime<Utc>,
    /// Challenge parameters
    pub rules: &'a ChallengeRules,
}

/// Commission totals with display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionTotalsView {
    /// Raw totals
    #[serde(flatten)]
    pub summary: CommissionSummary,
    /// `total` formatted for the locale
    pub total_formatted: String,
    /// `available` formatted for the locale
    pub available_formatted: String,
    /// `pending` formatted for the locale
    pub pending_formatted: String,
}

impl CommissionTotalsView {
    fn new(summary: CommissionSummary, locale: Locale) -> Self {
        Self {
            total_formatted: format_currency(summary.total, locale),
            available_formatted: format_currency(summary.available, locale),
            pending_formatted: format_currency(summary.pending, locale),
            summary,
        }
    }
}

/// Challenge card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
    /// Commission earned inside the window
    pub current_commission: f64,
    /// Commission needed for the bonus
    pub target: f64,
    /// Progress towards the target, capped at 100
    pub progress_percent: f64,
    /// Target reached
    pub completed: bool,
    /// Window still open
    pub is_active: bool,
    /// End of the window
    pub ends_at: DateTime<Utc>,
    /// Rendered countdown, e.g. `"12d 3h 40m"`
    pub countdown_text: String,
    /// Contracts counted towards the target
    pub qualifying_contracts: usize,
    /// When the bonus was redeemed, if it was
    pub bonus_claimed_at: Option<DateTime<Utc>>,
    /// Target reached and not yet redeemed
    pub can_redeem: bool,
}

impl ChallengeView {
    fn new(state: &ChallengeState, bonus_claimed_at: Option<DateTime<Utc>>, locale: Locale) -> Self {
        Self {
            current_commission: state.current_commission,
            target: state.target,
            progress_percent: state.progress_percent,
            completed: state.completed,
            is_active: state.is_active,
            ends_at: state.ends_at,
            countdown_text: state.countdown.render(locale),
            qualifying_contracts: state.qualifying_contracts,
            bonus_claimed_at,
            can_redeem: state.completed && bonus_claimed_at.is_none(),
        }
    }
}

/// Landing page after login.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Display name
    pub partner_name: String,
    /// Referral code, when assigned
    pub partner_code: Option<PartnerCode>,
    /// `None` until the partner has a code
    pub referral_link: Option<String>,
    /// Lead totals
    pub stats: LeadStats,
    /// Commission totals over every contract
    pub commissions: CommissionTotalsView,
    /// `None` when the partner has no registration date
    pub challenge: Option<ChallengeView>,
}

/// One row of the commissions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractLine {
    /// Contract id
    pub id: i64,
    /// Human-facing number
    pub contract_number: String,
    /// Short description
    pub title: String,
    /// Name of the referred client, when the lead is still on record
    pub client_name: Option<String>,
    /// Contract value
    pub total_value: f64,
    /// Percentage actually applied, after the default fallback
    pub commission_percentage: f64,
    /// Amount the client has paid so far
    pub amount_paid: f64,
    /// Commission on the full value
    pub commission_total: f64,
    /// Commission on the paid amount
    pub commission_available: f64,
    /// Commission still waiting on payment
    pub commission_pending: f64,
    /// Contract status as stored
    pub status: String,
    /// Signature date
    pub signed_at: Option<DateTime<Utc>>,
}

/// Commissions page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionsView {
    /// Totals over every contract
    pub totals: CommissionTotalsView,
    /// One line per contract, newest first
    pub contracts: Vec<ContractLine>,
}

/// One row of the leads table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadLine {
    /// Lead id
    pub id: i64,
    /// Contact name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Pipeline status
    pub status: LeadStatus,
    /// Status in the display locale
    pub status_label: &'static str,
    /// Capture channel
    pub source: LeadSource,
    /// Capture time
    pub created_at: DateTime<Utc>,
    /// Last contact
    pub contacted_at: Option<DateTime<Utc>>,
    /// Due for a follow-up
    pub needs_remarketing: bool,
}

impl LeadLine {
    /// Table row for a lead as of `now`.
    #[must_use]
    pub fn new(lead: &lead::Model, locale: Locale, now: DateTime<Utc>) -> Self {
        let status = LeadStatus::from_db(&lead.status);
        Self {
            id: lead.id,
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            status,
            status_label: status.label(locale),
            source: LeadSource::from_db(&lead.source),
            created_at: lead.created_at,
            contacted_at: lead.contacted_at,
            needs_remarketing: needs_remarketing(lead, now),
        }
    }
}

/// Leads page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadsView {
    /// Stats over every lead, not only the filtered ones
    pub stats: LeadStats,
    /// Leads passing the search and status filter, newest first
    pub leads: Vec<LeadLine>,
}

/// Profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    /// Partner id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login and contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Referral code, when assigned
    pub code: Option<PartnerCode>,
    /// Registration date
    pub created_at: Option<DateTime<Utc>>,
    /// PIX key for payouts
    pub pix_key: Option<String>,
    /// Bank for payouts
    pub bank_name: Option<String>,
    /// Bank branch
    pub bank_agency: Option<String>,
    /// Bank account number
    pub bank_account: Option<String>,
    /// Account status
    pub status: String,
}

/// Fetches the partner's leads and contracts concurrently.
///
/// A partner without a code has nothing attributed and gets two empty lists.
pub async fn load_partner_records(
    db: &DatabaseConnection,
    partner: &partner::Model,
) -> Result<(Vec<lead::Model>, Vec<ContractRecord>)> {
    let Some(code) = PartnerCode::from_profile(partner.code) else {
        return Ok((Vec::new(), Vec::new()));
    };

    tokio::try_join!(
        get_leads_for_partner(db, code),
        get_contracts_for_partner(db, code)
    )
}

/// Assembles the dashboard from already-fetched records.
#[must_use]
pub fn build_dashboard(
    partner: &partner::Model,
    leads: &[lead::Model],
    contracts: &[ContractRecord],
    ctx: &ViewContext<'_>,
) -> DashboardView {
    let code = PartnerCode::from_profile(partner.code);
    let summary = summarize_commissions(contracts.iter().map(|record| &record.contract));
    let challenge = evaluate_challenge(partner.created_at, ctx.now, contracts, ctx.rules)
        .map(|state| ChallengeView::new(&state, partner.bonus_claimed_at, ctx.locale));

    DashboardView {
        partner_name: partner.name.clone(),
        partner_code: code,
        referral_link: build_referral_link(ctx.origin, ctx.locale, code),
        stats: compute_lead_stats(leads),
        commissions: CommissionTotalsView::new(summary, ctx.locale),
        challenge,
    }
}

/// Assembles the commissions page from already-fetched contracts.
#[must_use]
pub fn build_commissions(contracts: &[ContractRecord], locale: Locale) -> CommissionsView {
    let summary = summarize_commissions(contracts.iter().map(|record| &record.contract));
    let lines = contracts
        .iter()
        .map(|record| {
            let contract = &record.contract;
            let commission = compute_commission(contract);
            ContractLine {
                id: contract.id,
                contract_number: contract.contract_number.clone(),
                title: contract.title.clone(),
                client_name: record.lead.as_ref().map(|lead| lead.name.clone()),
                total_value: contract.total_value,
                commission_percentage: effective_percentage(contract.commission_percentage),
                amount_paid: contract.amount_paid,
                commission_total: commission.total,
                commission_available: commission.available,
                commission_pending: commission.pending,
                status: contract.status.clone(),
                signed_at: contract.signed_at,
            }
        })
        .collect();

    CommissionsView {
        totals: CommissionTotalsView::new(summary, locale),
        contracts: lines,
    }
}

/// Assembles the leads page, applying the search box and status filter.
#[must_use]
pub fn build_leads(
    leads: &[lead::Model],
    search_term: &str,
    status_filter: StatusFilter,
    locale: Locale,
    now: DateTime<Utc>,
) -> LeadsView {
    let lines = filter_leads(leads, search_term, status_filter)
        .into_iter()
        .map(|lead| LeadLine::new(lead, locale, now))
        .collect();

    LeadsView {
        stats: compute_lead_stats(leads),
        leads: lines,
    }
}

/// Profile page for a partner.
#[must_use]
pub fn build_profile(partner: &partner::Model) -> ProfileView {
    ProfileView {
        id: partner.id,
        name: partner.name.clone(),
        email: partner.email.clone(),
        phone: partner.phone.clone(),
        code: PartnerCode::from_profile(partner.code),
        created_at: partner.created_at,
        pix_key: partner.pix_key.clone(),
        bank_name: partner.bank_name.clone(),
        bank_agency: partner.bank_agency.clone(),
        bank_account: partner.bank_account.clone(),
        status: partner.status.clone(),
    }
}

/// Fetches and assembles the dashboard.
pub async fn dashboard_view(
    db: &DatabaseConnection,
    partner: &partner::Model,
    ctx: &ViewContext<'_>,
) -> Result<DashboardView> {
    let (leads, contracts) = load_partner_records(db, partner).await?;
    tracing::debug!(
        partner_id = partner.id,
        leads = leads.len(),
        contracts = contracts.len(),
        "dashboard records loaded"
    );
    Ok(build_dashboard(partner, &leads, &contracts, ctx))
}

/// Fetches and assembles the commissions page.
pub async fn commissions_view(
    db: &DatabaseConnection,
    partner: &partner::Model,
    locale: Locale,
) -> Result<CommissionsView> {
    let contracts = match PartnerCode::from_profile(partner.code) {
        Some(code) => get_contracts_for_partner(db, code).await?,
        None => Vec::new(),
    };
    Ok(build_commissions(&contracts, locale))
}

/// Fetches and assembles the leads page.
pub async fn leads_view(
    db: &DatabaseConnection,
    partner: &partner::Model,
    search_term: &str,
    status_filter: StatusFilter,
    ctx: &ViewContext<'_>,
) -> Result<LeadsView> {
    let leads = match PartnerCode::from_profile(partner.code) {
        Some(code) => get_leads_for_partner(db, code).await?,
        None => Vec::new(),
    };
    Ok(build_leads(&leads, search_term, status_filter, ctx.locale, ctx.now))
}

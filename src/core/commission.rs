//! Commission arithmetic for referral contracts.
//!
//! A partner earns `commission_percentage` of a contract's value. The part
//! matching what the client already paid is *available*; the rest is
//! *pending*. All functions here are pure and total: malformed amounts count as
//! zero and a missing percentage falls back to [`DEFAULT_COMMISSION_PERCENTAGE`].

use crate::entities::contract;
use serde::Serialize;

/// Percentage applied when a contract does not carry its own.
pub const DEFAULT_COMMISSION_PERCENTAGE: f64 = 10.0;

/// Commission derived from a single contract.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Commission {
    /// Commission over the full contract value
    pub total: f64,
    /// Commission over what has been paid so far
    pub available: f64,
    /// `total - available`
    pub pending: f64,
}

/// Commission totals across many contracts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
    /// Sum of per-contract totals
    pub total: f64,
    /// Sum of per-contract available amounts
    pub available: f64,
    /// Sum of per-contract pending amounts
    pub pending: f64,
    /// Number of contracts summed
    pub contract_count: usize,
}

/// Coerces a stored amount into something safe to multiply.
///
/// NaN, infinities and negative values are treated as 0.
#[must_use]
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Resolves the percentage to apply.
///
/// Absent, zero and malformed values all fall back to the default, so an
/// explicit 0% commission cannot be represented.
#[must_use]
pub fn effective_percentage(percentage: Option<f64>) -> f64 {
    match percentage {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => DEFAULT_COMMISSION_PERCENTAGE,
    }
}

/// Computes total, available and pending commission for one contract.
#[must_use]
pub fn compute_commission(contract: &contract::Model) -> Commission {
    let percentage = effective_percentage(contract.commission_percentage);
    let total = sanitize_amount(contract.total_value) * percentage / 100.0;
    let available = sanitize_amount(contract.amount_paid) * percentage / 100.0;

    Commission {
        total,
        available,
        pending: total - available,
    }
}

/// Sums the commission of every contract.
#[must_use]
pub fn summarize_commissions<'a, I>(contracts: I) -> CommissionSummary
where
    I: IntoIterator<Item = &'a contract::Model>,
{
    contracts
        .into_iter()
        .fold(CommissionSummary::default(), |mut summary, contract| {
            let commission = compute_commission(contract);
            summary.total += commission.total;
            summary.available += commission.available;
            summary.pending += commission.pending;
            summary.contract_count += 1;
            summary
        })
}

/// Formats a currency amount the way each locale writes money.
///
/// `pt-BR` uses `R$ 1.234,56`, `en` uses `R$1,234.56`.
#[must_use]
pub fn format_currency(amount: f64, locale: crate::core::locale::Locale) -> String {
    use crate::core::locale::Locale;

    let negative = amount < 0.0;
    // Cast safety: display-only rounding of realistic currency amounts.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let (group_sep, decimal_sep, prefix) = match locale {
        Locale::PtBr => ('.', ',', "R$ "),
        Locale::En => (',', '.', "R$"),
    };

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{prefix}{grouped}{decimal_sep}{fraction:02}")
}

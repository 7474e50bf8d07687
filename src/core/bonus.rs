//! Challenge bonus redemption.
//!
//! A partner who reaches the challenge target may claim the bonus once. The
//! claim is written before the notification goes out, and is released again
//! if the notifier fails, so a partner never receives two bonuses and never
//! loses one to a transient mail outage.

use crate::{
    core::{
        challenge::{ChallengeRules, evaluate_challenge},
        contracts::get_contracts_for_partner,
        notify::{BonusRedemption, NotificationEvent, Notifier},
        partners::{claim_bonus, get_partner_by_id, release_bonus_claim},
        referral::PartnerCode,
    },
    entities::partner,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

/// A successful redemption.
#[derive(Debug, Clone, PartialEq)]
pub struct Redemption {
    /// Partner as stored after the claim
    pub partner: partner::Model,
    /// Qualifying commission at redemption time
    pub commission: f64,
    /// When the claim was recorded
    pub claimed_at: DateTime<Utc>,
}

/// Redeems the challenge bonus for a partner.
///
/// Fails with [`Error::BonusAlreadyClaimed`] on a second attempt,
/// [`Error::ChallengeUnavailable`] when the partner has no registration date,
/// [`Error::ChallengeNotCompleted`] below the target, and
/// [`Error::Notification`] when the notifier rejects the event.
pub async fn redeem_bonus(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    partner_id: i64,
    rules: &ChallengeRules,
    now: DateTime<Utc>,
) -> Result<Redemption> {
    let partner = get_partner_by_id(db, partner_id)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;

    if let Some(claimed_at) = partner.bonus_claimed_at {
        return Err(Error::BonusAlreadyClaimed { claimed_at });
    }

    let contracts = match PartnerCode::from_profile(partner.code) {
        Some(code) => get_contracts_for_partner(db, code).await?,
        None => Vec::new(),
    };

    let state = evaluate_challenge(partner.created_at, now, &contracts, rules)
        .ok_or(Error::ChallengeUnavailable { partner_id })?;
    if !state.completed {
        return Err(Error::ChallengeNotCompleted {
            current: state.current_commission,
            target: state.target,
        });
    }

    if !claim_bonus(db, partner_id, now).await? {
        // Lost a race with a concurrent redemption.
        let claimed_at = get_partner_by_id(db, partner_id)
            .await?
            .and_then(|p| p.bonus_claimed_at)
            .unwrap_or(now);
        return Err(Error::BonusAlreadyClaimed { claimed_at });
    }

    let event = NotificationEvent::BonusRedeemed(BonusRedemption {
        partner_id,
        partner_name: partner.name.clone(),
        partner_email: partner.email.clone(),
        commission: state.current_commission,
        target: state.target,
        redeemed_at: now,
    });

    if let Err(e) = notifier.send(&event).await {
        tracing::error!(partner_id, error = %e, "bonus notification failed, releasing claim");
        if let Err(release_err) = release_bonus_claim(db, partner_id).await {
            // The claim stays set; staff must clear it before the partner can retry.
            tracing::error!(partner_id, error = %release_err, "failed to release bonus claim");
        }
        return Err(match e {
            Error::Notification { .. } => e,
            other => Error::Notification {
                message: other.to_string(),
            },
        });
    }

    tracing::info!(
        partner_id,
        commission = state.current_commission,
        "challenge bonus redeemed"
    );

    Ok(Redemption {
        partner: partner::Model {
            bonus_claimed_at: Some(now),
            ..partner
        },
        commission: state.current_commission,
        claimed_at: now,
    })
}

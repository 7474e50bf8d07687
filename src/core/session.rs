//! Partner sessions.
//!
//! Sessions are issued by the login flow and presented as bearer tokens. A
//! resolved [`Session`] carries the partner profile, which the rest of the
//! portal treats as read-only input.

use crate::{
    entities::{Partner, PartnerSession, partner, partner_session},
    errors::{Error, Result},
};
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{Set, prelude::*};
use uuid::Uuid;

/// An authenticated partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The bearer token that was presented
    pub token: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Current partner profile
    pub partner: partner::Model,
}

/// Issues a new session token for a partner.
pub async fn create_session(
    db: &DatabaseConnection,
    partner_id: i64,
    now: DateTime<Utc>,
    ttl: TimeDelta,
) -> Result<partner_session::Model> {
    Partner::find_by_id(partner_id)
        .one(db)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;

    let session = partner_session::ActiveModel {
        token: Set(Uuid::new_v4().simple().to_string()),
        partner_id: Set(partner_id),
        created_at: Set(now),
        expires_at: Set(now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)),
        ..Default::default()
    };

    let session = session.insert(db).await?;
    tracing::info!(partner_id, expires_at = %session.expires_at, "session issued");
    Ok(session)
}

/// Looks up a bearer token. Unknown and expired tokens resolve to `None`.
pub async fn resolve_session(
    db: &DatabaseConnection,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Session>> {
    let row = PartnerSession::find()
        .filter(partner_session::Column::Token.eq(token))
        .find_also_related(Partner)
        .one(db)
        .await?;

    let Some((session, Some(partner))) = row else {
        tracing::debug!("unknown session token");
        return Ok(None);
    };

    if session.expires_at <= now {
        tracing::debug!(partner_id = session.partner_id, "session expired");
        return Ok(None);
    }

    Ok(Some(Session {
        token: session.token,
        expires_at: session.expires_at,
        partner,
    }))
}

/// Revokes a token. Returns whether a session was removed.
pub async fn sign_out(db: &DatabaseConnection, token: &str) -> Result<bool> {
    let result = PartnerSession::delete_many()
        .filter(partner_session::Column::Token.eq(token))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!("session revoked");
    }
    Ok(result.rows_affected > 0)
}

/// Re-reads the partner profile behind a session.
pub async fn refresh_profile(db: &DatabaseConnection, session: &Session) -> Result<Session> {
    let partner = Partner::find_by_id(session.partner.id)
        .one(db)
        .await?
        .ok_or(Error::PartnerNotFound {
            id: session.partner.id,
        })?;

    Ok(Session {
        partner,
        ..session.clone()
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::partners::{ProfileUpdate, create_partner, update_profile};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_resolve_session() -> Result<()> {
        let db = setup_test_db().await?;
        let now = utc(2024, 1, 1, 0, 0, 0);
        let partner = create_partner(&db, new_partner("Paula", Some(42)), now).await?;

        let issued = create_session(&db, partner.id, now, TimeDelta::hours(1)).await?;
        assert_eq!(issued.token.len(), 32);

        let session = resolve_session(&db, &issued.token, now + TimeDelta::minutes(59))
            .await?
            .unwrap();
        assert_eq!(session.partner, partner);
        assert_eq!(session.expires_at, now + TimeDelta::hours(1));
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_and_unknown_tokens() -> Result<()> {
        let db = setup_test_db().await?;
        let now = utc(2024, 1, 1, 0, 0, 0);
        let partner = create_partner(&db, new_partner("Paula", Some(42)), now).await?;
        let issued = create_session(&db, partner.id, now, TimeDelta::hours(1)).await?;

        assert!(resolve_session(&db, &issued.token, now + TimeDelta::hours(1)).await?.is_none());
        assert!(resolve_session(&db, "not-a-token", now).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_session_for_unknown_partner() -> Result<()> {
        let db = setup_test_db().await?;
        let err = create_session(&db, 12, utc(2024, 1, 1, 0, 0, 0), TimeDelta::hours(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PartnerNotFound { id: 12 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_out() -> Result<()> {
        let db = setup_test_db().await?;
        let now = utc(2024, 1, 1, 0, 0, 0);
        let partner = create_partner(&db, new_partner("Paula", Some(42)), now).await?;
        let issued = create_session(&db, partner.id, now, TimeDelta::hours(1)).await?;

        assert!(sign_out(&db, &issued.token).await?);
        assert!(!sign_out(&db, &issued.token).await?);
        assert!(resolve_session(&db, &issued.token, now).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_profile_picks_up_edits() -> Result<()> {
        let db = setup_test_db().await?;
        let now = utc(2024, 1, 1, 0, 0, 0);
        let partner = create_partner(&db, new_partner("Paula", Some(42)), now).await?;
        let issued = create_session(&db, partner.id, now, TimeDelta::hours(1)).await?;
        let session = resolve_session(&db, &issued.token, now).await?.unwrap();

        let update = ProfileUpdate {
            name: "Paula Reis".to_string(),
            ..Default::default()
        };
        update_profile(&db, partner.id, update).await?;

        let refreshed = refresh_profile(&db, &session).await?;
        assert_eq!(refreshed.partner.name, "Paula Reis");
        assert_eq!(refreshed.token, session.token);
        Ok(())
    }
}

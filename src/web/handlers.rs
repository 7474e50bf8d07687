//! Route handlers for the partner pages.
//!
//! Handlers fetch, call into [`crate::core`], and return JSON. They never
//! compute anything themselves.

use super::{
    AppState,
    error::ApiError,
    extract::{Localize, PathLocale},
};
use crate::core::{
    bonus::redeem_bonus,
    commission::format_currency,
    dashboard::{
        CommissionsView, DashboardView, LeadLine, LeadsView, ProfileView, ViewContext, build_profile,
        commissions_view, dashboard_view, leads_view,
    },
    leads::mark_lead_contacted,
    partners::{ProfileUpdate, update_profile},
    referral::PartnerCode,
    session::{Session, sign_out},
    status::StatusFilter,
};
use crate::errors::Error;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /{locale}/plataforma-parceiro/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    PathLocale(locale): PathLocale,
    Extension(session): Extension<Session>,
) -> Result<Json<DashboardView>, ApiError> {
    let ctx = ViewContext {
        origin: &state.config.site_origin,
        locale,
        now: state.now(),
        rules: &state.config.challenge,
    };
    let view = dashboard_view(&state.db, &session.partner, &ctx)
        .await
        .localize(locale)?;
    Ok(Json(view))
}

/// `GET /{locale}/plataforma-parceiro/comissoes`
pub async fn commissions(
    State(state): State<AppState>,
    PathLocale(locale): PathLocale,
    Extension(session): Extension<Session>,
) -> Result<Json<CommissionsView>, ApiError> {
    let view = commissions_view(&state.db, &session.partner, locale)
        .await
        .localize(locale)?;
    Ok(Json(view))
}

/// Query string of the leads page.
#[derive(Debug, Default, Deserialize)]
pub struct LeadsQuery {
    /// Name or email substring
    #[serde(default)]
    pub search: String,
    /// `all` or a lead status
    #[serde(default)]
    pub status: String,
}

/// `GET /{locale}/plataforma-parceiro/leads?search=&status=`
pub async fn leads(
    State(state): State<AppState>,
    PathLocale(locale): PathLocale,
    Extension(session): Extension<Session>,
    Query(query): Query<LeadsQuery>,
) -> Result<Json<LeadsView>, ApiError> {
    let status_filter: StatusFilter = query.status.parse().localize(locale)?;
    let ctx = ViewContext {
        origin: &state.config.site_origin,
        locale,
        now: state.now(),
        rules: &state.config.challenge,
    };
    let view = leads_view(&state.db, &session.partner, &query.search, status_filter, &ctx)
        .await
        .localize(locale)?;
    Ok(Json(view))
}

/// `POST /{locale}/plataforma-parceiro/leads/{id}/contato`
pub async fn mark_contacted(
    State(state): State<AppState>,
    PathLocale(locale): PathLocale,
    Extension(session): Extension<Session>,
    Path((_, lead_id)): Path<(String, i64)>,
) -> Result<Json<LeadLine>, ApiError> {
    let code = PartnerCode::from_profile(session.partner.code)
        .ok_or(Error::LeadNotFound { id: lead_id })
        .localize(locale)?;
    let now = state.now();
    let lead = mark_lead_contacted(&state.db, code, lead_id, now)
        .await
        .localize(locale)?;
    Ok(Json(LeadLine::new(&lead, locale, now)))
}

/// `GET /{locale}/plataforma-parceiro/perfil`
pub async fn profile(Extension(session): Extension<Session>) -> Json<ProfileView> {
    Json(build_profile(&session.partner))
}

/// `PUT /{locale}/plataforma-parceiro/perfil`
pub async fn edit_profile(
    State(state): State<AppState>,
    PathLocale(locale): PathLocale,
    Extension(session): Extension<Session>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileView>, ApiError> {
    let partner = update_profile(&state.db, session.partner.id, update)
        .await
        .localize(locale)?;
    Ok(Json(build_profile(&partner)))
}

/// Response to a successful redemption.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionView {
    /// Qualifying commission at redemption time
    pub commission: f64,
    /// `commission` formatted for the locale
    pub commission_formatted: String,
    /// When the claim was recorded
    pub claimed_at: DateTime<Utc>,
}

/// `POST /{locale}/plataforma-parceiro/desafio/resgatar`
pub async fn redeem(
    State(state): State<AppState>,
    PathLocale(locale): PathLocale,
    Extension(session): Extension<Session>,
) -> Result<Json<RedemptionView>, ApiError> {
    let redemption = redeem_bonus(
        &state.db,
        state.notifier.as_ref(),
        session.partner.id,
        &state.config.challenge,
        state.now(),
    )
    .await
    .localize(locale)?;

    Ok(Json(RedemptionView {
        commission: redemption.commission,
        commission_formatted: format_currency(redemption.commission, locale),
        claimed_at: redemption.claimed_at,
    }))
}

/// `POST /{locale}/plataforma-parceiro/sair`
pub async fn logout(
    State(state): State<AppState>,
    PathLocale(locale): PathLocale,
    Extension(session): Extension<Session>,
) -> Result<StatusCode, ApiError> {
    sign_out(&state.db, &session.token).await.localize(locale)?;
    tracing::info!(partner_id = session.partner.id, "partner signed out");
    Ok(StatusCode::NO_CONTENT)
}

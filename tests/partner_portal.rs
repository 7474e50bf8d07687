#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use partner_portal::{
    config::{database::create_tables, portal::PortalConfig},
    core::{
        clock::ManualClock,
        contracts::{NewContract, create_contract},
        leads::{NewLead, record_lead},
        notify::{NotificationEvent, Notifier, queued_notifications},
        partners::{NewPartner, create_partner, get_partner_by_id},
        referral::PartnerCode,
        session::create_session,
        status::LeadSource,
    },
    errors::{Error, Result},
    web::{AppState, router},
};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tower::ServiceExt;

fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single().unwrap()
}

#[derive(Default)]
struct CountingNotifier {
    sent: AtomicUsize,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn send(&self, _event: &NotificationEvent) -> Result<()> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct DownNotifier;

#[async_trait]
impl Notifier for DownNotifier {
    async fn send(&self, _event: &NotificationEvent) -> Result<()> {
        Err(Error::Notification {
            message: "smtp timeout".to_string(),
        })
    }
}

struct Portal {
    db: DatabaseConnection,
    partner_id: i64,
    token: String,
}

/// Partner 42 registered on Jan 1st with one closed referral worth a
/// 3000 commission and one open referral; the clock reads Jan 20th.
async fn seed() -> Portal {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    create_tables(&db).await.unwrap();

    let registered = utc(2024, 1, 1);
    let partner = create_partner(
        &db,
        NewPartner {
            name: "Paula Reis".to_string(),
            email: "paula@example.com".to_string(),
            phone: None,
            code: Some(42),
        },
        registered,
    )
    .await
    .unwrap();

    let closed = record_lead(&db, lead("Ana Souza", Some(42)), utc(2024, 1, 5)).await.unwrap();
    record_lead(&db, lead("Bruno Lima", Some(42)), utc(2024, 1, 8)).await.unwrap();
    record_lead(&db, lead("Mariana Alves", Some(7)), utc(2024, 1, 8)).await.unwrap();
    partner_portal::core::leads::update_lead_status(
        &db,
        closed.id,
        partner_portal::core::status::LeadStatus::Closed,
        utc(2024, 1, 12),
    )
    .await
    .unwrap();

    create_contract(
        &db,
        NewContract {
            contract_number: "CT-2024-001".to_string(),
            title: "Inventory system".to_string(),
            total_value: 30_000.0,
            commission_percentage: Some(10.0),
            amount_paid: 12_000.0,
            signed_at: Some(utc(2024, 1, 12)),
            lead_id: closed.id,
        },
        utc(2024, 1, 12),
    )
    .await
    .unwrap();

    let session = create_session(&db, partner.id, utc(2024, 1, 20), TimeDelta::hours(12))
        .await
        .unwrap();

    Portal {
        db,
        partner_id: partner.id,
        token: session.token,
    }
}

fn lead(name: &str, code: Option<u64>) -> NewLead {
    NewLead {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: None,
        message: None,
        source: LeadSource::Referral,
        partner_code: code.map(PartnerCode::new),
    }
}

fn app(portal: &Portal, notifier: Arc<dyn Notifier>) -> Router {
    let config = PortalConfig {
        site_origin: "https://portal.example.com".to_string(),
        ..PortalConfig::default()
    };
    let state = AppState::new(portal.db.clone(), config)
        .with_notifier(notifier)
        .with_clock(Arc::new(ManualClock::new(utc(2024, 1, 20))));
    router(state)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let payload = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, payload)
}

#[tokio::test]
async fn health_needs_no_session() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, _, body) = call(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unauthenticated_request_redirects_to_login() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, headers, _) = call(&app, "GET", "/en/plataforma-parceiro/leads?status=closed", None, None).await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        headers[header::LOCATION],
        "/en/plataforma-parceiro/login?redirect=%2Fen%2Fplataforma-parceiro%2Fleads%3Fstatus%3Dclosed"
    );

    let (status, headers, _) = call(&app, "GET", "/pt-BR/plataforma-parceiro/dashboard", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(
        headers[header::LOCATION]
            .to_str()
            .unwrap()
            .starts_with("/pt-BR/plataforma-parceiro/login?redirect=")
    );
}

#[tokio::test]
async fn dashboard_aggregates_partner_records() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, _, body) = call(&app, "GET", "/pt-BR/plataforma-parceiro/dashboard", Some(&portal.token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["partnerName"], "Paula Reis");
    assert_eq!(body["referralLink"], "https://portal.example.com/pt-BR?ref=42");
    assert_eq!(body["stats"]["total"], 2);
    assert_eq!(body["stats"]["closed"], 1);
    assert_eq!(body["stats"]["inProgress"], 1);
    assert_eq!(body["stats"]["conversionRate"], 50);
    assert_eq!(body["commissions"]["total"], 3000.0);
    assert_eq!(body["commissions"]["available"], 1200.0);
    assert_eq!(body["commissions"]["pending"], 1800.0);
    assert_eq!(body["commissions"]["totalFormatted"], "R$ 3.000,00");
    assert_eq!(body["challenge"]["completed"], true);
    assert_eq!(body["challenge"]["progressPercent"], 100.0);
    assert_eq!(body["challenge"]["countdownText"], "11d 0h 0m");
    assert_eq!(body["challenge"]["canRedeem"], true);
}

#[tokio::test]
async fn commissions_page_lists_contracts() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, _, body) = call(&app, "GET", "/en/plataforma-parceiro/comissoes", Some(&portal.token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["contractCount"], 1);
    assert_eq!(body["totals"]["totalFormatted"], "R$3,000.00");
    assert_eq!(body["contracts"][0]["clientName"], "Ana Souza");
    assert_eq!(body["contracts"][0]["commissionAvailable"], 1200.0);
}

#[tokio::test]
async fn leads_page_filters_and_labels() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, _, body) = call(
        &app,
        "GET",
        "/en/plataforma-parceiro/leads?search=ANA&status=closed",
        Some(&portal.token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let leads = body["leads"].as_array().unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["name"], "Ana Souza");
    assert_eq!(leads[0]["statusLabel"], "Closed");
    assert_eq!(body["stats"]["total"], 2);

    let (status, _, body) = call(
        &app,
        "GET",
        "/en/plataforma-parceiro/leads?status=archived",
        Some(&portal.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["field"], "status");
}

#[tokio::test]
async fn unsupported_locale_is_not_found() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, _, body) = call(&app, "GET", "/fr/plataforma-parceiro/dashboard", Some(&portal.token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unsupported_locale");
}

#[tokio::test]
async fn mark_contacted_only_for_own_leads() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (_, _, leads) = call(&app, "GET", "/en/plataforma-parceiro/leads", Some(&portal.token), None).await;
    let own_id = leads["leads"][0]["id"].as_i64().unwrap();

    let (status, _, body) = call(
        &app,
        "POST",
        &format!("/en/plataforma-parceiro/leads/{own_id}/contato"),
        Some(&portal.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contactedAt"], "2024-01-20T00:00:00Z");
    assert_eq!(body["needsRemarketing"], false);

    // Lead 3 belongs to partner 7
    let (status, _, body) = call(&app, "POST", "/pt-BR/plataforma-parceiro/leads/3/contato", Some(&portal.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Registro não encontrado.");
}

#[tokio::test]
async fn profile_can_be_read_and_edited() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, _, body) = call(
        &app,
        "PUT",
        "/en/plataforma-parceiro/perfil",
        Some(&portal.token),
        Some(json!({ "name": "Paula R. Reis", "pixKey": " paula@pix ", "bankName": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Paula R. Reis");
    assert_eq!(body["pixKey"], "paula@pix");
    assert_eq!(body["bankName"], Value::Null);

    let (status, _, body) = call(&app, "GET", "/en/plataforma-parceiro/perfil", Some(&portal.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Paula R. Reis");
    assert_eq!(body["code"], 42);

    let (status, _, body) = call(
        &app,
        "PUT",
        "/en/plataforma-parceiro/perfil",
        Some(&portal.token),
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn bonus_is_redeemed_at_most_once() {
    let portal = seed().await;
    let notifier = Arc::new(CountingNotifier::default());
    let app = app(&portal, notifier.clone());

    let (status, _, body) = call(&app, "POST", "/en/plataforma-parceiro/desafio/resgatar", Some(&portal.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["commission"], 3000.0);
    assert_eq!(body["commissionFormatted"], "R$3,000.00");

    // A second session for the same partner is rejected too
    let other = create_session(&portal.db, portal.partner_id, utc(2024, 1, 20), TimeDelta::hours(1))
        .await
        .unwrap();
    let (status, _, body) = call(&app, "POST", "/en/plataforma-parceiro/desafio/resgatar", Some(&other.token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "bonus_already_claimed");

    assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);

    let (_, _, dashboard) = call(&app, "GET", "/en/plataforma-parceiro/dashboard", Some(&portal.token), None).await;
    assert_eq!(dashboard["challenge"]["canRedeem"], false);
    assert_eq!(dashboard["challenge"]["bonusClaimedAt"], "2024-01-20T00:00:00Z");
}

#[tokio::test]
async fn failed_notification_leaves_bonus_unclaimed() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(DownNotifier));

    let (status, _, body) = call(&app, "POST", "/en/plataforma-parceiro/desafio/resgatar", Some(&portal.token), None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "notification_failed");
    let partner = get_partner_by_id(&portal.db, portal.partner_id).await.unwrap().unwrap();
    assert!(partner.bonus_claimed_at.is_none());
}

#[tokio::test]
async fn default_state_queues_outbox_notification() {
    let portal = seed().await;
    let state = AppState::new(portal.db.clone(), PortalConfig::default())
        .with_clock(Arc::new(ManualClock::new(utc(2024, 1, 20))));
    let app = router(state);

    let (status, _, _) = call(&app, "POST", "/pt-BR/plataforma-parceiro/desafio/resgatar", Some(&portal.token), None).await;

    assert_eq!(status, StatusCode::OK);
    let queued = queued_notifications(&portal.db).await.unwrap();
    assert_eq!(queued.len(), 1);
    assert!(queued[0].payload.contains("\"partnerEmail\":\"paula@example.com\""));
}

#[tokio::test]
async fn sign_out_ends_the_session() {
    let portal = seed().await;
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, _, _) = call(&app, "POST", "/en/plataforma-parceiro/sair", Some(&portal.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = call(&app, "GET", "/en/plataforma-parceiro/dashboard", Some(&portal.token), None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn partner_without_code_sees_empty_pages() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    create_tables(&db).await.unwrap();
    let partner = create_partner(
        &db,
        NewPartner {
            name: "New Partner".to_string(),
            email: "new@example.com".to_string(),
            phone: None,
            code: None,
        },
        utc(2024, 1, 1),
    )
    .await
    .unwrap();
    let session = create_session(&db, partner.id, utc(2024, 1, 20), TimeDelta::hours(1))
        .await
        .unwrap();
    let portal = Portal {
        db,
        partner_id: partner.id,
        token: session.token,
    };
    let app = app(&portal, Arc::new(CountingNotifier::default()));

    let (status, _, body) = call(&app, "GET", "/en/plataforma-parceiro/dashboard", Some(&portal.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["referralLink"], Value::Null);
    assert_eq!(body["stats"]["total"], 0);
    assert_eq!(body["stats"]["conversionRate"], 0);
    assert_eq!(body["challenge"]["progressPercent"], 0.0);

    let (status, _, body) = call(&app, "POST", "/en/plataforma-parceiro/desafio/resgatar", Some(&portal.token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "challenge_not_completed");
}

//! End-to-end test of the commission pipeline: onboard an affiliate, record
//! sales against their codes, then settle earnings through a payout.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{
    accept_invite, create_invite, create_product, send_json, signup_tenant, spawn_app,
    unique_suffix,
};

struct OnboardedAffiliate {
    affiliate_id: String,
    referral_code: String,
    tracking_code: String,
}

async fn onboard_affiliate(
    app: &axum::Router,
    admin_token: &str,
    product_id: &str,
) -> OnboardedAffiliate {
    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) = create_invite(app, admin_token, product_id, &email).await;
    let (status, body) = accept_invite(app, &invite_id, &invite_token).await;
    assert_eq!(status, StatusCode::OK, "accept failed: {}", body);

    let url = body["tracking_link_url"].as_str().unwrap();
    let tracking_code = url.rsplit('/').next().unwrap().to_string();

    OnboardedAffiliate {
        affiliate_id: body["affiliate_id"].as_str().unwrap().to_string(),
        referral_code: body["referral_code"].as_str().unwrap().to_string(),
        tracking_code,
    }
}

#[tokio::test]
async fn sale_by_referral_code_applies_tier_rate() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    // Product rate 10%, but the affiliate sits on the default 5% tier and
    // the tier rate wins.
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;
    let affiliate = onboard_affiliate(&app, &tenant.access_token, &product_id).await;

    let (status, sale) = send_json(
        &app,
        "POST",
        "/api/v1/sales",
        Some(&tenant.access_token),
        Some(json!({
            "product_id": product_id,
            "referral_code": affiliate.referral_code,
            "amount_cents": 10_000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "sale failed: {}", sale);

    assert_eq!(sale["affiliate_id"], affiliate.affiliate_id.as_str());
    assert_eq!(sale["commission_rate"], 5.0);
    assert_eq!(sale["commission_cents"], 500);
    assert!(sale["tracking_link_id"].is_null());
}

#[tokio::test]
async fn sale_by_tracking_code_counts_a_conversion() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;
    let affiliate = onboard_affiliate(&app, &tenant.access_token, &product_id).await;

    let (status, sale) = send_json(
        &app,
        "POST",
        "/api/v1/sales",
        Some(&tenant.access_token),
        Some(json!({
            "product_id": product_id,
            "tracking_code": affiliate.tracking_code,
            "amount_cents": 2_000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "sale failed: {}", sale);
    assert!(sale["tracking_link_id"].as_str().is_some());

    // The conversion shows up on the affiliate's link list.
    let (status, links) = send_json(
        &app,
        "GET",
        "/api/v1/tracking-links",
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let link = links["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["code"] == affiliate.tracking_code.as_str())
        .expect("link missing from list");
    assert_eq!(link["conversion_count"], 1);
}

#[tokio::test]
async fn sale_requires_an_attribution_code() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/sales",
        Some(&tenant.access_token),
        Some(json!({ "product_id": product_id, "amount_cents": 1_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sale_rejects_unknown_referral_code() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/sales",
        Some(&tenant.access_token),
        Some(json!({
            "product_id": product_id,
            "referral_code": "NOPE1234",
            "amount_cents": 1_000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn suspended_affiliate_cannot_earn() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;
    let affiliate = onboard_affiliate(&app, &tenant.access_token, &product_id).await;

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/v1/affiliates/{}/status", affiliate.affiliate_id),
        Some(&tenant.access_token),
        Some(json!({ "status": "suspended" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/sales",
        Some(&tenant.access_token),
        Some(json!({
            "product_id": product_id,
            "referral_code": affiliate.referral_code,
            "amount_cents": 1_000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn public_click_endpoint_counts_clicks() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;
    let affiliate = onboard_affiliate(&app, &tenant.access_token, &product_id).await;

    let uri = format!("/api/v1/tracking-links/{}/click", affiliate.tracking_code);
    let (status, body) = send_json(&app, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK, "click failed: {}", body);
    assert_eq!(body["click_count"], 1);

    let (status, body) = send_json(&app, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["click_count"], 2);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/tracking-links/nosuchcode/click",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_tracking_link_is_gone() {
    let (app, pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;
    let affiliate = onboard_affiliate(&app, &tenant.access_token, &product_id).await;

    sqlx::query("UPDATE tracking_links SET expires_at = NOW() - INTERVAL '1 hour' WHERE code = $1")
        .bind(&affiliate.tracking_code)
        .execute(&pool)
        .await
        .unwrap();

    let uri = format!("/api/v1/tracking-links/{}/click", affiliate.tracking_code);
    let (status, _) = send_json(&app, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::GONE);

    let redirect = format!("/t/{}", affiliate.tracking_code);
    let (status, _) = send_json(&app, "GET", &redirect, None, None).await;
    assert_eq!(status, StatusCode::GONE);
}

#[tokio::test]
async fn payout_settles_accumulated_commissions() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;
    let affiliate = onboard_affiliate(&app, &tenant.access_token, &product_id).await;

    // Two sales at 5% of 10_000 each.
    for _ in 0..2 {
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/v1/sales",
            Some(&tenant.access_token),
            Some(json!({
                "product_id": product_id,
                "referral_code": affiliate.referral_code,
                "amount_cents": 10_000
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, payout) = send_json(
        &app,
        "POST",
        "/api/v1/payouts",
        Some(&tenant.access_token),
        Some(json!({ "affiliate_id": affiliate.affiliate_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "payout failed: {}", payout);
    assert_eq!(payout["amount_cents"], 1_000);
    assert_eq!(payout["status"], "pending");
    let payout_id = payout["id"].as_str().unwrap();

    // Nothing left to settle, so a second payout is rejected.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/payouts",
        Some(&tenant.access_token),
        Some(json!({ "affiliate_id": affiliate.affiliate_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, paid) = send_json(
        &app,
        "POST",
        &format!("/api/v1/payouts/{}/pay", payout_id),
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid["status"], "paid");
    assert!(paid["paid_at"].as_str().is_some());

    // Paying twice conflicts.
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/v1/payouts/{}/pay", payout_id),
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn payout_for_unknown_affiliate_is_not_found() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/payouts",
        Some(&tenant.access_token),
        Some(json!({ "affiliate_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

//! Integration tests for the invitation and onboarding workflow.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{
    accept_invite, create_invite, create_product, send_json, signup_tenant, spawn_app,
    unique_suffix,
};

#[tokio::test]
async fn invite_and_accept_provisions_affiliate() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) =
        create_invite(&app, &tenant.access_token, &product_id, &email).await;

    let (status, body) = accept_invite(&app, &invite_id, &invite_token).await;
    assert_eq!(status, StatusCode::OK, "accept failed: {}", body);

    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["is_existing_user"], false);
    assert!(body["affiliate_id"].as_str().is_some());
    assert!(body["referral_code"].as_str().is_some());
    assert!(body["tracking_link_url"].as_str().unwrap().contains("/t/"));

    // Tokens log the new affiliate straight in; no password in sight.
    let access = body["tokens"]["access_token"].as_str().unwrap();
    let (status, me) = send_json(&app, "GET", "/api/v1/users/me", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "affiliate");
    assert_eq!(me["tenant_id"], tenant.tenant_id.as_str());
}

#[tokio::test]
async fn accepting_twice_is_an_idempotent_replay() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) =
        create_invite(&app, &tenant.access_token, &product_id, &email).await;

    let (status, _) = accept_invite(&app, &invite_id, &invite_token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = accept_invite(&app, &invite_id, &invite_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_existing_user"], true);
    assert_eq!(body["email"], email.as_str());
    assert!(body.get("tokens").is_none() || body["tokens"].is_null());
}

#[tokio::test]
async fn accepting_unknown_invite_is_not_found() {
    let (app, _pool) = spawn_app().await;

    let (status, _) = accept_invite(&app, &Uuid::new_v4().to_string(), "bogus-token").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_pending_invite_conflicts() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let email = format!("affiliate-{}@test.example", unique_suffix());
    create_invite(&app, &tenant.access_token, &product_id, &email).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/v1/affiliates/invite",
        Some(&tenant.access_token),
        Some(json!({ "email": email, "product_id": product_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "expected conflict: {}", body);
}

#[tokio::test]
async fn invite_requires_admin_role() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    // Onboard an affiliate, then try to invite with the affiliate's token.
    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) =
        create_invite(&app, &tenant.access_token, &product_id, &email).await;
    let (_, body) = accept_invite(&app, &invite_id, &invite_token).await;
    let affiliate_access = body["tokens"]["access_token"].as_str().unwrap();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/affiliates/invite",
        Some(affiliate_access),
        Some(json!({
            "email": format!("x-{}@test.example", unique_suffix()),
            "product_id": product_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invite_rejects_unknown_product() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/affiliates/invite",
        Some(&tenant.access_token),
        Some(json!({
            "email": format!("a-{}@test.example", unique_suffix()),
            "product_id": Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pending_invite_can_be_deleted() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) =
        create_invite(&app, &tenant.access_token, &product_id, &email).await;

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/v1/affiliates/invites/{}", invite_id),
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = accept_invite(&app, &invite_id, &invite_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_accepts_provision_exactly_one_affiliate() {
    let (app, pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) =
        create_invite(&app, &tenant.access_token, &product_id, &email).await;

    let (first, second) = tokio::join!(
        accept_invite(&app, &invite_id, &invite_token),
        accept_invite(&app, &invite_id, &invite_token),
    );

    assert_eq!(first.0, StatusCode::OK, "first accept: {}", first.1);
    assert_eq!(second.0, StatusCode::OK, "second accept: {}", second.1);

    // Exactly one of the two performed the provisioning; the loser of the
    // conditional status update got the replay response.
    let fresh_accepts = [&first.1, &second.1]
        .iter()
        .filter(|body| body["is_existing_user"] == false)
        .count();
    assert_eq!(fresh_accepts, 1, "{} vs {}", first.1, second.1);

    let affiliate_rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM affiliates a JOIN users u ON u.id = a.user_id WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(affiliate_rows, 1);
}

#[tokio::test]
async fn expired_invite_is_gone() {
    let (app, pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) =
        create_invite(&app, &tenant.access_token, &product_id, &email).await;

    sqlx::query("UPDATE invites SET expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(Uuid::parse_str(&invite_id).unwrap())
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = accept_invite(&app, &invite_id, &invite_token).await;
    assert_eq!(status, StatusCode::GONE);
}

#[tokio::test]
async fn onboarded_affiliate_sets_password_and_logs_in() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) =
        create_invite(&app, &tenant.access_token, &product_id, &email).await;
    let (_, accepted) = accept_invite(&app, &invite_id, &invite_token).await;
    let affiliate_access = accepted["tokens"]["access_token"].as_str().unwrap();

    // Password-less until now; login must refuse.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "Chosen4Later" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/v1/users/me/password",
        Some(affiliate_access),
        Some(json!({ "new_password": "Chosen4Later" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT, "set password: {}", body);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "Chosen4Later" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login: {}", body);
    assert_eq!(body["user"]["role"], "affiliate");
}

#[tokio::test]
async fn changing_password_requires_the_current_one() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;

    // Admins signed up with a password; omitting or flubbing it must fail.
    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/v1/users/me/password",
        Some(&tenant.access_token),
        Some(json!({ "new_password": "BrandNew1Pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/v1/users/me/password",
        Some(&tenant.access_token),
        Some(json!({
            "current_password": "not-the-password",
            "new_password": "BrandNew1Pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/v1/users/me/password",
        Some(&tenant.access_token),
        Some(json!({
            "current_password": tenant.password,
            "new_password": "BrandNew1Pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": tenant.email, "password": "BrandNew1Pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn accepted_affiliate_appears_in_admin_list() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let email = format!("affiliate-{}@test.example", unique_suffix());
    let (invite_id, invite_token) =
        create_invite(&app, &tenant.access_token, &product_id, &email).await;
    let (_, accepted) = accept_invite(&app, &invite_id, &invite_token).await;
    let affiliate_id = accepted["affiliate_id"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/v1/affiliates",
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let found = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"] == affiliate_id && a["status"] == "active");
    assert!(found, "affiliate missing from list: {}", body);
}

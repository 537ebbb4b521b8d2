//! Integration tests for tenant-scoped CRUD, plan limits, and isolation.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create_product, send_json, signup_tenant, spawn_app};

#[tokio::test]
async fn product_crud_roundtrip() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;

    let product_id = create_product(&app, &tenant.access_token, "Starter Kit").await;

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/api/v1/products/{}", product_id),
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Starter Kit");
    assert_eq!(body["price_cents"], 4999);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/v1/products/{}", product_id),
        Some(&tenant.access_token),
        Some(json!({ "price_cents": 5999 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price_cents"], 5999);
    assert_eq!(body["name"], "Starter Kit");

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/v1/products/{}", product_id),
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Soft delete: the product still exists, inactive.
    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/api/v1/products/{}", product_id),
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
async fn trial_plan_caps_products_at_five() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;

    for i in 0..5 {
        create_product(&app, &tenant.access_token, &format!("Product {}", i)).await;
    }

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/v1/products",
        Some(&tenant.access_token),
        Some(json!({
            "name": "One Too Many",
            "price_cents": 999,
            "commission_rate": 5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "plan_limit_reached");
}

#[tokio::test]
async fn trial_plan_caps_commission_tiers_at_two() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;

    // Bronze is seeded at signup; one more fills the trial allowance.
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/v1/commission-tiers",
        Some(&tenant.access_token),
        Some(json!({ "name": "Silver", "commission_rate": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/v1/commission-tiers",
        Some(&tenant.access_token),
        Some(json!({ "name": "Gold", "commission_rate": 15.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "plan_limit_reached");
}

#[tokio::test]
async fn tenant_usage_reports_counts_and_limits() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;
    create_product(&app, &tenant.access_token, "Starter Kit").await;

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/v1/tenants/me/usage",
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"], "trial");
    assert_eq!(body["products"]["current"], 1);
    assert_eq!(body["products"]["max"], 5);
    assert_eq!(body["commission_tiers"]["current"], 1);
    assert_eq!(body["invoicing_available"], false);
}

#[tokio::test]
async fn tenants_cannot_see_each_others_rows() {
    let (app, _pool) = spawn_app().await;
    let tenant_a = signup_tenant(&app).await;
    let tenant_b = signup_tenant(&app).await;

    let product_id = create_product(&app, &tenant_a.access_token, "A's Product").await;

    // Tenant B's token cannot read tenant A's product.
    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/v1/products/{}", product_id),
        Some(&tenant_b.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nor does it appear in tenant B's list.
    let (status, body) = send_json(
        &app,
        "GET",
        "/api/v1/products",
        Some(&tenant_b.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn tenant_me_returns_the_token_tenant() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/v1/tenants/me",
        Some(&tenant.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], tenant.tenant_id.as_str());
    assert_eq!(body["slug"], tenant.slug.as_str());
    assert_eq!(body["plan"], "trial");
    assert!(body["trial_ends_at"].as_str().is_some());
}

#[tokio::test]
async fn admin_can_rename_tenant() {
    let (app, _pool) = spawn_app().await;
    let tenant = signup_tenant(&app).await;

    let (status, body) = send_json(
        &app,
        "PATCH",
        "/api/v1/tenants/me",
        Some(&tenant.access_token),
        Some(json!({ "name": "Acme Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme Renamed");
}

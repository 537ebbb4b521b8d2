//! Product catalog domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_amount_cents, validate_commission_rate};

use super::pagination::Pagination;

/// Tenant-scoped catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Product {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    /// Base commission rate as a percentage, used when the affiliate's tier
    /// does not override it.
    pub commission_rate: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateProductRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_amount_cents"))]
    pub price_cents: i64,
    #[validate(custom(function = "validate_commission_rate"))]
    pub commission_rate: f64,
}

/// Request to update a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProductRequest {
    #[validate(length(min = 2, max = 255, message = "Name must be 2-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_amount_cents"))]
    pub price_cents: Option<i64>,
    #[validate(custom(function = "validate_commission_rate"))]
    pub commission_rate: Option<f64>,
    pub is_active: Option<bool>,
}

/// Response for product list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListProductsResponse {
    pub data: Vec<Product>,
    pub pagination: Pagination,
}

/// Query parameters for listing products.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListProductsQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Starter Kit".to_string(),
            description: Some("A starter kit".to_string()),
            price_cents: 4999,
            commission_rate: 10.0,
        }
    }

    #[test]
    fn test_create_product_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_product_request_rejects_free_product() {
        let mut request = valid_request();
        request.price_cents = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_product_request_rejects_bad_rate() {
        let mut request = valid_request();
        request.commission_rate = -5.0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_product_request_partial() {
        let request = UpdateProductRequest {
            name: None,
            description: None,
            price_cents: Some(1999),
            commission_rate: None,
            is_active: Some(false),
        };
        assert!(request.validate().is_ok());
    }
}

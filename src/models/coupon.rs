use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{DiscountType, coupon_entity};
use crate::error::{AppError, AppResult};

pub const INVALID_COUPON_MESSAGE: &str = "Invalid coupon code";

/// Coupon record as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percentage points for `PERCENTAGE`, currency amount for `FIXED`.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64)]
    pub discount_value: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    #[schema(value_type = f64)]
    pub min_order_amount: Decimal,
    /// Cap for `PERCENTAGE` coupons; ignored for `FIXED`.
    #[serde(with = "rust_decimal::serde::arbitrary_precision_option")]
    #[schema(value_type = Option<f64>)]
    pub max_discount_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<coupon_entity::Model> for Coupon {
    fn from(row: coupon_entity::Model) -> Self {
        Self {
            id: row.id,
            code: row.code,
            description: row.description,
            discount_type: row.discount_type,
            discount_value: row.discount_value,
            min_order_amount: row.min_order_amount,
            max_discount_amount: row.max_discount_amount,
            usage_limit: row.usage_limit,
            used_count: row.used_count,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// Body of `POST /coupons/validate`.
///
/// Both fields are optional at the serde level so that missing or malformed
/// values surface as `InvalidArgument` instead of an extractor rejection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    pub code: Option<String>,
    /// Decimal string or JSON number.
    #[schema(value_type = Option<String>, example = "200.00")]
    pub order_amount: Option<serde_json::Value>,
}

/// A validate request that passed boundary checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponValidationInput {
    pub code: String,
    pub order_amount: Decimal,
}

impl ValidateCouponRequest {
    pub fn parse(self) -> AppResult<CouponValidationInput> {
        let code = self
            .code
            .ok_or_else(|| AppError::InvalidArgument("code is required".to_string()))?;
        let raw = self
            .order_amount
            .ok_or_else(|| AppError::InvalidArgument("orderAmount is required".to_string()))?;

        let order_amount = match &raw {
            serde_json::Value::String(s) => parse_amount(s),
            serde_json::Value::Number(n) => parse_amount(&n.to_string()),
            _ => None,
        }
        .ok_or_else(|| AppError::InvalidArgument(format!("orderAmount is not a number: {raw}")))?;

        Ok(CouponValidationInput { code, order_amount })
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    // rust_decimal tolerates digit separators, plain decimal notation does not
    if raw.contains('_') {
        return None;
    }
    Decimal::from_str_exact(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Outcome of evaluating a code against an order amount.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponValidation {
    UnknownCode,
    Evaluated {
        valid: bool,
        coupon: Coupon,
        discount: Decimal,
    },
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateCouponResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::arbitrary_precision_option"
    )]
    #[schema(value_type = Option<f64>)]
    pub discount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<CouponValidation> for ValidateCouponResponse {
    fn from(outcome: CouponValidation) -> Self {
        match outcome {
            CouponValidation::UnknownCode => Self {
                valid: false,
                coupon: None,
                discount: None,
                message: Some(INVALID_COUPON_MESSAGE.to_string()),
            },
            CouponValidation::Evaluated {
                valid,
                coupon,
                discount,
            } => Self {
                valid,
                coupon: Some(coupon),
                discount: Some(discount),
                message: None,
            },
        }
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::database::CouponStore;
use crate::entities::DiscountType;
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Clone)]
pub struct CouponService {
    store: Arc<dyn CouponStore>,
}

impl CouponService {
    pub fn new(store: Arc<dyn CouponStore>) -> Self {
        Self { store }
    }

    pub async fn list_active_coupons(&self) -> AppResult<Vec<Coupon>> {
        self.store.list_active().await
    }

    pub async fn get_coupon_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        self.store.find_active_by_code(code).await
    }

    /// Checks the request at the boundary, then evaluates it against a single
    /// reading of the clock.
    pub async fn validate_coupon(
        &self,
        request: ValidateCouponRequest,
    ) -> AppResult<CouponValidation> {
        let input = request.parse()?;
        self.validate_coupon_at(&input.code, input.order_amount, Utc::now())
            .await
    }

    pub async fn validate_coupon_at(
        &self,
        code: &str,
        order_amount: Decimal,
        now: DateTime<Utc>,
    ) -> AppResult<CouponValidation> {
        let Some(coupon) = self.store.find_active_by_code(code).await? else {
            log::info!("Coupon validation for unknown code {code}");
            return Ok(CouponValidation::UnknownCode);
        };

        let valid = is_coupon_valid(&coupon, order_amount, now);
        // Reported even when the coupon does not qualify.
        let discount = calculate_discount(&coupon, order_amount)?;

        log::debug!(
            "Coupon {} evaluated for amount {order_amount}: valid={valid}, discount={discount}",
            coupon.code
        );

        Ok(CouponValidation::Evaluated {
            valid,
            coupon,
            discount,
        })
    }
}

/// `usage_limit`, `used_count` and `valid_from` are not consulted.
pub fn is_coupon_valid(coupon: &Coupon, order_amount: Decimal, now: DateTime<Utc>) -> bool {
    coupon.active && order_amount >= coupon.min_order_amount && now < coupon.valid_until
}

pub fn calculate_discount(coupon: &Coupon, order_amount: Decimal) -> AppResult<Decimal> {
    match coupon.discount_type {
        DiscountType::Percentage => {
            let out_of_range = || {
                AppError::InvalidArgument(format!(
                    "orderAmount {order_amount} cannot be discounted exactly"
                ))
            };
            let amount = order_amount.normalize();
            let rate = coupon.discount_value.normalize();

            // A product that kept its full scale was not rounded.
            let mut discount = amount
                .checked_mul(rate)
                .filter(|product| {
                    amount.is_zero()
                        || rate.is_zero()
                        || product.scale() == amount.scale() + rate.scale()
                })
                .ok_or_else(out_of_range)?;
            // Shifting the scale divides by 100 without rounding.
            discount
                .set_scale(discount.scale() + 2)
                .map_err(|_| out_of_range())?;
            let discount = discount.normalize();

            Ok(match coupon.max_discount_amount {
                Some(cap) => discount.min(cap),
                None => discount,
            })
        }
        DiscountType::Fixed => Ok(coupon.discount_value),
    }
}

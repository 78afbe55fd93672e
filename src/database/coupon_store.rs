use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::database::DbPool;
use crate::entities::coupon_entity as coupons;
use crate::error::AppResult;
use crate::models::Coupon;

/// Read-only access to persisted coupons.
///
/// Both queries only ever see records with `active = true`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponStore: Send + Sync {
    async fn list_active(&self) -> AppResult<Vec<Coupon>>;

    /// Exact, case-sensitive match on `code`.
    async fn find_active_by_code(&self, code: &str) -> AppResult<Option<Coupon>>;
}

pub struct SeaOrmCouponStore {
    pool: DbPool,
}

impl SeaOrmCouponStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponStore for SeaOrmCouponStore {
    async fn list_active(&self) -> AppResult<Vec<Coupon>> {
        let rows = coupons::Entity::find()
            .filter(coupons::Column::Active.eq(true))
            .all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Coupon::from).collect())
    }

    async fn find_active_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        let row = coupons::Entity::find()
            .filter(coupons::Column::Code.eq(code))
            .filter(coupons::Column::Active.eq(true))
            .one(&self.pool)
            .await?;

        Ok(row.map(Coupon::from))
    }
}

pub mod coupons;

pub use coupons as coupon_entity;
pub use coupons::DiscountType;

pub mod common;
pub mod coupon;

pub use common::*;
pub use coupon::*;

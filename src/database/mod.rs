pub mod connection;
pub mod coupon_store;

pub use connection::*;
pub use coupon_store::*;

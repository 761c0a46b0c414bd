pub mod cache;
pub mod payment;

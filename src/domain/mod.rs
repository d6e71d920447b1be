pub mod payment;
pub mod ports;
pub mod promotion;
pub mod query;
pub mod transaction;

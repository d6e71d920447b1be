pub mod payments;
pub mod promotions;
pub mod transactions;

pub mod checkout;
pub mod config;

pub mod account;
pub mod car;
pub mod checkout;
pub mod health;
pub mod rental;

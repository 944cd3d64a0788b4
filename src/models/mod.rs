pub mod car;
pub mod checkout;
pub mod rental;
pub mod user;

pub mod booking;
pub mod payment;
pub mod pricing_service;
pub mod stripe;

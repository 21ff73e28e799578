pub mod common;

pub mod a001_client;
pub mod a002_visa_application;
pub mod a003_pricing;
pub mod a004_invoice;
pub mod a005_payment;

pub mod a001_client;
pub mod a004_invoice;

//! Shared contracts between backend and frontend:
//! domain aggregates, DTOs and the invoice line-item picker core.

pub mod domain;
pub mod picker;

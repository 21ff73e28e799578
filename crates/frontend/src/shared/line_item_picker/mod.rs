//! Invoice line-item picker widget.
//!
//! Wraps the pure [`contracts::picker::SelectionState`] in Leptos signals
//! and talks to the backend provider endpoints. All server I/O goes through
//! [`provider::ProviderClient`]; the component never fetches on its own.

pub mod component;
pub mod provider;

pub use component::LineItemPicker;
pub use provider::{ProviderClient, ProviderError};

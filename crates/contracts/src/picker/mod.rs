//! Invoice line-item picker core.
//!
//! Pure selection/reconciliation model for attaching a variable set of
//! billable line items (visa applications) to an invoice. Framework-free:
//! the frontend wraps [`SelectionState`] in signals and renders it, the
//! backend speaks the same wire DTOs. All mutations go through the state's
//! methods so the available/selected lists can never drift apart.

pub mod error;
pub mod line_item;
pub mod state;
pub mod wire;

pub use error::{PickerError, ProviderErrorKind};
pub use line_item::LineItem;
pub use state::{PickerMode, SelectionState};
pub use wire::{AddItemRequest, AvailableItemsResponse, ErrorResponse, SelectedItemsResponse};

pub mod api_utils;
pub mod line_item_picker;

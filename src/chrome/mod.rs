//! Built-in chrome: dialog and bottom-sheet factories
//!
//! Each chrome type owns one reserved metadata key; attach the matching
//! properties at registration (the `metadata()` constructors do this) and
//! the corresponding provider picks the entry up.

pub mod dialog;
mod layout;
pub mod sheet;

pub use dialog::{DialogFactoryProvider, DialogProperties, ALERT_DIALOG_KEY};
pub use layout::PopupSize;
pub use sheet::{BottomSheetFactoryProvider, SheetProperties, BOTTOM_SHEET_KEY};

//! Suspending popup coordination for ratatui applications
//!
//! Application code calls [`PopupHostState::show`] with a typed popup
//! identity and suspends until the user acts; the [`PopupHost`] sitting in
//! the render loop draws whichever chrome the entry's metadata selects and
//! routes the user's decision back. The caller and the chrome never learn
//! about each other's concrete types.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use popup_host::chrome::{DialogFactoryProvider, DialogProperties};
//! use popup_host::{Popup, PopupHost, PopupHostState, PopupRegistry, PopupTheme};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! struct ConfirmDelete;
//!
//! impl Popup for ConfirmDelete {
//!     type Output = bool;
//! }
//!
//! # async fn demo() -> Result<(), popup_host::RegistryError> {
//! let mut builder = PopupRegistry::builder();
//! builder.entry(
//!     ConfirmDelete,
//!     DialogFactoryProvider::metadata(DialogProperties::default().with_title("Delete?")),
//!     |_: &ConfirmDelete,
//!      frame: &mut popup_host::Frame<'_>,
//!      area: ratatui::layout::Rect,
//!      _: &PopupTheme,
//!      _: &popup_host::PopupResponder<'_, bool>| {
//!         frame.render_widget(ratatui::widgets::Paragraph::new("y / n"), area);
//!     },
//! )?;
//!
//! let state = PopupHostState::new();
//! let mut host = PopupHost::new(state.clone(), Arc::new(builder.build()));
//!
//! // Render loop: host.render(frame, area, &theme) every frame and
//! // host.handle_key_event(key) while host.is_active().
//!
//! // Anywhere else in the application:
//! let confirmed: Option<bool> = state.show(ConfirmDelete).await;
//! # let _ = (confirmed, &mut host);
//! # Ok(())
//! # }
//! ```

mod error;
mod factory;
mod host;
mod id;
mod metadata;
mod registry;
mod state;
mod theme;

pub mod chrome;

pub use error::RegistryError;
pub use factory::{FactoryScope, PopupFactory, PopupFactoryProvider};
pub use host::PopupHost;
pub use id::{Popup, PopupKey};
pub use metadata::{Metadata, MetadataValue};
pub use registry::{PopupContent, PopupEntry, PopupRegistry, PopupRegistryBuilder, PopupResponder};
pub use state::{PendingPopup, PopupHostState, PopupOutcome};
pub use theme::PopupTheme;

/// Render target alias, matching the ratatui backend in use.
pub type Frame<'a> = ratatui::Frame<'a>;

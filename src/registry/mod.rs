//! Popup registry: identity to entry resolution
//!
//! Content is registered at build time, either for one specific identity
//! value or for every value of an identity type, together with the
//! metadata that later selects its chrome. Duplicate registrations fail
//! immediately; lookups mint a [`PopupEntry`] on demand.

mod entry;

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::RegistryError;
use crate::id::{Popup, PopupKey};
use crate::metadata::Metadata;

use entry::{ContentAdapter, ErasedContent};

pub use entry::{PopupContent, PopupEntry, PopupResponder};

/// Immutable identity-to-content lookup built by [`PopupRegistryBuilder`].
pub struct PopupRegistry {
    by_type: HashMap<TypeId, Registration>,
    by_value: HashMap<RegisteredKey, Registration>,
}

impl PopupRegistry {
    pub fn builder() -> PopupRegistryBuilder {
        PopupRegistryBuilder::default()
    }

    /// Produce the entry for `id`.
    ///
    /// A registration for the identity's *type* wins over one for the
    /// specific value; the value registration is the fallback. Type
    /// handlers are the general case and stay authoritative even when a
    /// value handler could also match.
    pub fn entry_for(&self, id: &Arc<dyn PopupKey>) -> Result<PopupEntry, RegistryError> {
        if let Some(registration) = self.by_type.get(&id.as_any().type_id()) {
            return Ok(registration.mint(Arc::clone(id)));
        }
        if let Some(registration) = self.by_value.get(&RegisteredKey(Arc::clone(id))) {
            return Ok(registration.mint(Arc::clone(id)));
        }
        Err(RegistryError::NotRegistered(format!("{:?}", id)))
    }

    /// Whether `id` would resolve to an entry.
    pub fn is_registered(&self, id: &Arc<dyn PopupKey>) -> bool {
        self.by_type.contains_key(&id.as_any().type_id())
            || self.by_value.contains_key(&RegisteredKey(Arc::clone(id)))
    }
}

struct Registration {
    metadata: Arc<Metadata>,
    content: Arc<dyn ErasedContent>,
}

impl Registration {
    fn new<P: Popup>(metadata: Metadata, content: impl PopupContent<P>) -> Self {
        Self {
            metadata: Arc::new(metadata),
            content: Arc::new(ContentAdapter::<P, _>::new(content)),
        }
    }

    fn mint(&self, id: Arc<dyn PopupKey>) -> PopupEntry {
        PopupEntry::new(id, Arc::clone(&self.metadata), Arc::clone(&self.content))
    }
}

/// Builder collecting popup registrations, failing fast on duplicates.
///
/// ```
/// use popup_host::chrome::{DialogFactoryProvider, DialogProperties};
/// use popup_host::{Popup, PopupRegistry};
/// # use popup_host::{Frame, PopupResponder, PopupTheme};
/// # use ratatui::layout::Rect;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct ConfirmQuit;
///
/// impl Popup for ConfirmQuit {
///     type Output = bool;
/// }
///
/// # fn main() -> Result<(), popup_host::RegistryError> {
/// let mut builder = PopupRegistry::builder();
/// builder.entry(
///     ConfirmQuit,
///     DialogFactoryProvider::metadata(DialogProperties::default().with_title("Quit?")),
///     |_: &ConfirmQuit,
///      frame: &mut Frame<'_>,
///      area: Rect,
///      _: &PopupTheme,
///      _: &PopupResponder<'_, bool>| {
///         frame.render_widget(ratatui::widgets::Paragraph::new("y/n"), area);
///     },
/// )?;
/// let registry = builder.build();
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PopupRegistryBuilder {
    by_type: HashMap<TypeId, Registration>,
    by_value: HashMap<RegisteredKey, Registration>,
}

impl std::fmt::Debug for PopupRegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupRegistryBuilder")
            .field("by_type", &self.by_type.len())
            .field("by_value", &self.by_value.len())
            .finish()
    }
}

impl PopupRegistryBuilder {
    /// Register content for one specific identity value.
    pub fn entry<P: Popup>(
        &mut self,
        popup: P,
        metadata: Metadata,
        content: impl PopupContent<P>,
    ) -> Result<&mut Self, RegistryError> {
        let key = RegisteredKey(Arc::new(popup) as Arc<dyn PopupKey>);
        if self.by_value.contains_key(&key) {
            return Err(RegistryError::DuplicateValue(format!("{:?}", key.0)));
        }
        self.by_value.insert(key, Registration::new(metadata, content));
        Ok(self)
    }

    /// Register content for every identity value of type `P`.
    pub fn entry_for_type<P: Popup>(
        &mut self,
        metadata: Metadata,
        content: impl PopupContent<P>,
    ) -> Result<&mut Self, RegistryError> {
        let type_id = TypeId::of::<P>();
        if self.by_type.contains_key(&type_id) {
            return Err(RegistryError::DuplicateType(type_name::<P>()));
        }
        self.by_type.insert(type_id, Registration::new(metadata, content));
        Ok(self)
    }

    pub fn build(self) -> PopupRegistry {
        PopupRegistry {
            by_type: self.by_type,
            by_value: self.by_value,
        }
    }
}

/// Hash-map key wrapping an erased identity value.
struct RegisteredKey(Arc<dyn PopupKey>);

impl PartialEq for RegisteredKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for RegisteredKey {}

impl Hash for RegisteredKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

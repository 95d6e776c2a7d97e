//! Popup identity types
//!
//! A popup is named by an identity value. The identity also fixes, at the
//! type level, what the interaction produces: a `ConfirmQuit` popup can
//! only ever resolve to a `bool`, a `PickModel` popup to a `ModelId`, and
//! the compiler holds callers to that.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Type-erased popup identity.
///
/// Implemented automatically for any `Eq + Hash + Debug` value, so popup
/// identities are ordinary unit structs or enums with derives. The erased
/// form is what the registry and the pending-popup slot store; typed code
/// goes through [`Popup`] instead.
pub trait PopupKey: Any + Send + Sync + fmt::Debug {
    /// Upcast for downcasting back to the concrete identity type.
    fn as_any(&self) -> &dyn Any;

    /// Value equality across the erased boundary. Identities of different
    /// concrete types never compare equal.
    fn dyn_eq(&self, other: &dyn PopupKey) -> bool;

    /// Hashing across the erased boundary. The concrete `TypeId` is mixed
    /// in so equal payloads of different types hash apart.
    fn dyn_hash(&self, hasher: &mut dyn Hasher);
}

impl<T> PopupKey for T
where
    T: Any + Eq + Hash + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn PopupKey) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn dyn_hash(&self, mut hasher: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut hasher);
        self.hash(&mut hasher);
    }
}

/// A popup identity together with its result type.
///
/// `Output` is what the suspended [`show`](crate::PopupHostState::show)
/// caller receives when the user acts; dismissal yields `None` instead.
///
/// ```
/// use popup_host::Popup;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct ConfirmQuit;
///
/// impl Popup for ConfirmQuit {
///     type Output = bool;
/// }
/// ```
pub trait Popup: PopupKey {
    /// Result type produced by this popup.
    type Output: Send + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct ConfirmQuit;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct PickNumber(u8);

    fn hash_of(key: &dyn PopupKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.dyn_hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equal_values_compare_equal_through_erasure() {
        let a: &dyn PopupKey = &PickNumber(3);
        let b = PickNumber(3);
        assert!(a.dyn_eq(&b));
        assert_eq!(hash_of(a), hash_of(&b));
    }

    #[test]
    fn distinct_values_compare_unequal() {
        let a: &dyn PopupKey = &PickNumber(3);
        assert!(!a.dyn_eq(&PickNumber(4)));
    }

    #[test]
    fn different_types_never_compare_equal() {
        let a: &dyn PopupKey = &ConfirmQuit;
        assert!(!a.dyn_eq(&PickNumber(0)));
    }
}

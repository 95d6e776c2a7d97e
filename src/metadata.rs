//! Entry metadata used for chrome selection
//!
//! Metadata is an open, string-keyed map of opaque typed values. It exists
//! so factory providers can pick the chrome for an entry without the
//! registry or the caller knowing about chrome types. By convention each
//! chrome type owns one reserved key and a typed value under it.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An opaque typed value stored under a metadata key.
#[derive(Clone)]
pub struct MetadataValue(Arc<dyn Any + Send + Sync>);

impl MetadataValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Downcast to the stored type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MetadataValue(..)")
    }
}

/// Open map from string key to opaque value.
///
/// Values are opaque, so equality is per-key value *instance* equality:
/// entries minted from the same registration share their metadata and
/// compare equal, while two maps built independently do not.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    values: HashMap<String, MetadataValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert `value` under `key`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), MetadataValue::new(value));
    }

    /// Typed access to the value under `key`. `None` when the key is
    /// missing or holds a value of a different type.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(MetadataValue::downcast_ref)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self.values.iter().all(|(key, value)| {
                other
                    .values
                    .get(key)
                    .map_or(false, |candidate| value.ptr_eq(candidate))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access_round_trips() {
        let metadata = Metadata::new().with("height", 12u16).with("label", "sheet");

        assert_eq!(metadata.get::<u16>("height"), Some(&12));
        assert_eq!(metadata.get::<&str>("label"), Some(&"sheet"));
        assert_eq!(metadata.len(), 2);
    }

    #[test]
    fn wrong_type_or_missing_key_yields_none() {
        let metadata = Metadata::new().with("height", 12u16);

        assert_eq!(metadata.get::<String>("height"), None);
        assert_eq!(metadata.get::<u16>("width"), None);
        assert!(!metadata.contains_key("width"));
    }

    #[test]
    fn clones_share_value_instances() {
        let metadata = Metadata::new().with("height", 12u16);
        let clone = metadata.clone();

        assert_eq!(metadata, clone);
    }

    #[test]
    fn independently_built_maps_are_not_equal() {
        let a = Metadata::new().with("height", 12u16);
        let b = Metadata::new().with("height", 12u16);

        assert_ne!(a, b);
    }
}

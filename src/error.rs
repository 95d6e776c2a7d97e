//! Error types for popup registration and lookup

use thiserror::Error;

/// Errors raised while building or querying the popup registry.
///
/// All of these are integration bugs surfaced at the call site that
/// triggered them; none are transient runtime conditions.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Content is already registered for this identity value.
    #[error("popup content already registered for value `{0}`")]
    DuplicateValue(String),

    /// Content is already registered for this identity type.
    #[error("popup content already registered for type `{0}`")]
    DuplicateType(&'static str),

    /// No by-type or by-value registration matches the identity.
    #[error("no popup content registered for `{0}`")]
    NotRegistered(String),
}

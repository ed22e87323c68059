//! Error types for metadata registration.

/// Errors that can occur when registering metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// A field definition was registered without a name.
    #[error("missing attribute name on field definition")]
    MissingFieldName,

    /// An object definition was registered without a name.
    #[error("missing attribute name on object definition")]
    MissingObjectName,

    /// The named object is not known to the registry.
    #[error("unknown object: {0}")]
    UnknownObject(String),
}

impl MetadataError {
    /// Returns `true` if this is an unknown-object error.
    #[must_use]
    pub fn is_unknown_object(&self) -> bool {
        matches!(self, Self::UnknownObject(_))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropertyError {
    /// Arguments given to a property factory do not describe a valid property.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Direct assignment to an attribute that is computed and cannot be written.
    #[error("Can't set attribute '{name}': computed attribute has no setter")]
    AttributeConflict { name: String },

    #[error("Attribute '{name}' not found")]
    AttributeNotFound { name: String },

    #[error("Failed to parse description config: {source}")]
    ConfigParse {
        #[source]
        source: toml::de::Error,
    },
}

impl PropertyError {
    pub fn conflict(name: impl Into<String>) -> Self {
        PropertyError::AttributeConflict { name: name.into() }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        PropertyError::AttributeNotFound { name: name.into() }
    }
}

pub type PropResult<T> = Result<T, PropertyError>;

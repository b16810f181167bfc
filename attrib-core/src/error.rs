//! Error types for the attrib core library.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering modality validation, catalog registration, and facade
//! precondition checks.

/// Errors raised while validating and assembling an experiment configuration.
///
/// All variants are fatal and surface synchronously at construction time.
/// Tunable-broadcast mismatches are deliberately *not* represented here;
/// they are filtered out by capability query and never become errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("auto-configuration for modality '{modality}' is not supported")]
    UnsupportedModality { modality: String },

    #[error("at least one modality is required")]
    EmptyModalities,

    #[error(
        "a target layer is required for text modality; it is usually the word embedding layer of the model"
    )]
    MissingLayer,

    #[error("background data is required for tabular modality")]
    MissingBackgroundData,

    #[error("explainer '{name}' is already registered")]
    AlreadyRegistered { name: String },

    #[error("explainer '{name}' is not registered")]
    UnknownExplainer { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_modality_names_offender() {
        let err = ConfigError::UnsupportedModality {
            modality: "audio".to_string(),
        };
        assert!(err.to_string().contains("audio"));
    }

    #[test]
    fn test_missing_layer_mentions_embedding() {
        let err = ConfigError::MissingLayer;
        assert!(err.to_string().contains("word embedding"));
    }
}

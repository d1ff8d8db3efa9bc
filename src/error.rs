use thiserror::Error;

/// Errors that can occur while collecting ingredients and querying for recipes
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// An action was attempted while its precondition did not hold
    #[error("{0}")]
    Validation(String),

    /// The recipe service could not be reached or answered with a failure
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered, but without a usable `recipes` sequence
    #[error("Unexpected response from recipe service: {0}")]
    Schema(String),

    /// A single recipe could not be turned into a display fragment
    #[error("Error rendering recipe {recipe_id}: {message}")]
    Render { recipe_id: String, message: String },

    /// A submit was attempted while another request was still outstanding
    #[error("A recipe request is already in progress")]
    RequestInFlight,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzerError::Network(err.to_string())
    }
}

impl AnalyzerError {
    /// Text shown to the user in the status line.
    ///
    /// Schema failures are worded as service failures.
    pub fn user_message(&self) -> String {
        match self {
            AnalyzerError::Validation(msg) => msg.clone(),
            AnalyzerError::Network(msg) => msg.clone(),
            AnalyzerError::Schema(msg) => {
                format!("Recipe service returned an invalid response: {}", msg)
            }
            AnalyzerError::Render { message, .. } => format!("Error rendering recipe: {}", message),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AnalyzerError::Validation("Please add at least one ingredient".to_string());
        assert_eq!(err.user_message(), "Please add at least one ingredient");
    }

    #[test]
    fn test_schema_message_mentions_invalid_response() {
        let err = AnalyzerError::Schema("missing `recipes`".to_string());
        assert!(err.user_message().contains("invalid response"));
        assert!(err.user_message().contains("missing `recipes`"));
    }

    #[test]
    fn test_render_error_display_names_recipe() {
        let err = AnalyzerError::Render {
            recipe_id: "recipe-1-0".to_string(),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Error rendering recipe recipe-1-0: boom");
        assert_eq!(err.user_message(), "Error rendering recipe: boom");
    }
}

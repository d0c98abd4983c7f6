// Error types shared by the stores, the compose assistant and the
// background lifecycle handler.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `chrome.storage` rejected a read or write
    #[error("storage {operation} failed: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    #[error("failed to decode `{key}` from storage: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode `{key}` for storage: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("draft generation failed: {0}")]
    Generation(String),

    #[error("no compose surface found on the page")]
    NoComposeSurface,

    #[error("failed to inject assistant widget: {0}")]
    Injection(String),

    /// Any other browser API failure (tabs, action badge, runtime)
    #[error("browser call `{call}` failed: {message}")]
    Browser { call: &'static str, message: String },
}

impl Error {
    pub fn storage(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Storage {
            operation,
            message: message.into(),
        }
    }

    pub fn browser(call: &'static str, message: impl Into<String>) -> Self {
        Error::Browser {
            call,
            message: message.into(),
        }
    }

    /// Text shown in a dashboard status banner
    pub fn banner_message(&self) -> String {
        match self {
            Error::Validation(e) => e.to_string(),
            other => format!("Something went wrong: {}", other),
        }
    }
}

/// Rejections raised before anything is written to storage.
/// The messages double as the banner text shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Name and email are required!")]
    RecipientIncomplete,

    #[error("Name and content are required!")]
    TemplateIncomplete,

    #[error("Max tokens must be between {min} and {max}, got {value}")]
    MaxTokensOutOfRange { value: u32, min: u32, max: u32 },

    #[error("Temperature must be between 0 and 1, got {0}")]
    TemperatureOutOfRange(f32),

    #[error("Invalid API key. Please check and try again.")]
    InvalidApiKey,
}

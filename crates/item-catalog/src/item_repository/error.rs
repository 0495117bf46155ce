use record_framework::FrameworkError;

/// Errors for the item resource.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("Invalid item: {0}")]
    Validation(String),
    #[error("Item serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Repository error: {0}")]
    Framework(#[from] FrameworkError),
}

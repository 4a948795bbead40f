/// Errors that can occur while producing a response document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The state payload was not valid JSON.
    #[error("state decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The document template is missing a required marker.
    #[error("invalid document template: {0}")]
    Template(&'static str),

    /// The application renderer failed.
    #[error("render failed: {0}")]
    App(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing configuration: {0} must be set")]
    MissingConfig(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

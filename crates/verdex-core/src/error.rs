//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerdexError {
    #[error("CONFIG/{0}")]
    ConfigError(String),

    #[error("FIELD/{0}")]
    FieldError(String),

    #[error("PROVIDER/{0}")]
    ProviderError(String),

    #[error("INSIGHT/{0}")]
    InsightError(String),

    #[error("TEMPLATE/{0}")]
    TemplateError(String),

    #[error("SERIALIZE/{0}")]
    SerializeError(String),
}

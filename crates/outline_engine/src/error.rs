use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("adapter table could not be parsed: {0}")]
    Parse(String),
    #[error("adapter for {host} declares no selectors")]
    EmptySelectors { host: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("document has no body element")]
    MissingBody,
    #[error("no element matches {selector}")]
    MissingElement { selector: String },
    #[error("markup produced no elements")]
    EmptyMarkup,
    #[error(transparent)]
    Selector(#[from] AdapterError),
}

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("invalid code length {length}; expected 1..={max}")]
    InvalidLength { length: usize, max: usize },
    #[error("scripted generator needs at least one code")]
    EmptyScript,
    #[error("scripted code is invalid: {0}")]
    InvalidCode(String),
}

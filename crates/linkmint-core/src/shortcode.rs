use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated short code identifier for a shortened URL.
///
/// Short codes are 1-32 ASCII alphanumeric characters. Generated codes are
/// always exactly the configured length; the wider bound only exists so that
/// stored codes survive a change of the configured length.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

pub const MAX_LENGTH: usize = 32;

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (generators, or rows read back from the link store).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.is_empty() || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between 1 and {}, got {}",
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only alphanumeric characters: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

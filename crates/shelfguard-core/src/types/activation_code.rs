//! One-time activation code type.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Error, InvalidInputError};

/// Number of characters in an activation code.
pub const ACTIVATION_CODE_LENGTH: usize = 6;

/// A complete activation code as typed by the user.
///
/// Codes are exactly [`ACTIVATION_CODE_LENGTH`] ASCII letters or digits.
/// Surrounding whitespace from copy/paste is ignored.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ActivationCode(String);

impl ActivationCode {
    /// Validate a code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code has the wrong length or contains
    /// anything other than ASCII alphanumerics.
    pub fn new(code: impl AsRef<str>) -> Result<Self, Error> {
        let code = code.as_ref().trim();

        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidInputError::ActivationCode {
                reason: "must contain only letters and digits".to_string(),
            }
            .into());
        }
        if code.len() != ACTIVATION_CODE_LENGTH {
            return Err(InvalidInputError::ActivationCode {
                reason: format!(
                    "must be {} characters, got {}",
                    ACTIVATION_CODE_LENGTH,
                    code.len()
                ),
            }
            .into());
        }

        Ok(Self(code.to_string()))
    }

    /// Returns the code value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for ActivationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

// Codes are single-use secrets; keep them out of logs.
impl fmt::Debug for ActivationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActivationCode").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_and_alphanumeric() {
        assert_eq!(ActivationCode::new("123456").unwrap().as_str(), "123456");
        assert_eq!(ActivationCode::new("a1B2c3").unwrap().as_str(), "a1B2c3");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(ActivationCode::new(" 654321\n").unwrap().as_str(), "654321");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(ActivationCode::new("12345").is_err());
        assert!(ActivationCode::new("1234567").is_err());
        assert!(ActivationCode::new("").is_err());
    }

    #[test]
    fn rejects_non_alphanumeric() {
        assert!(ActivationCode::new("12-456").is_err());
        assert!(ActivationCode::new("12345é").is_err());
    }

    #[test]
    fn debug_is_redacted() {
        let code = ActivationCode::new("123456").unwrap();
        assert!(!format!("{:?}", code).contains("123456"));
    }
}

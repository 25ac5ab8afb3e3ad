// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff password and kiosk PIN rules.

use thiserror::Error;

/// Credential policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password equals the login name.
    #[error("Password must not match login_name")]
    MatchesLoginName,

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,

    /// Kiosk PIN is not four ASCII digits.
    #[error("PIN must be exactly 4 digits")]
    InvalidPin,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Validates a staff password.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        login_name: &str,
    ) -> Result<(), CredentialPolicyError> {
        if password != confirmation {
            return Err(CredentialPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(CredentialPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        if password.eq_ignore_ascii_case(login_name) {
            return Err(CredentialPolicyError::MatchesLoginName);
        }

        Ok(())
    }
}

/// Checks that a kiosk PIN is exactly four ASCII digits.
///
/// # Errors
///
/// Returns `CredentialPolicyError::InvalidPin` otherwise.
pub fn validate_pin(pin: &str) -> Result<(), CredentialPolicyError> {
    if pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CredentialPolicyError::InvalidPin)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Signed kiosk session tokens.
//!
//! A successful PIN check issues an HS256 JWT bound to one employee. Every
//! clock or break request from the kiosk must carry it, and the body's
//! employee id must match the token's.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Value of the `type` claim on kiosk tokens.
pub const KIOSK_TOKEN_TYPE: &str = "kiosk_session";

/// How long a kiosk token stays valid.
pub const KIOSK_SESSION_TTL: Duration = Duration::hours(12);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KioskSessionError {
    #[error("Kiosk session secret is not configured")]
    MissingSecret,
    #[error("Missing kiosk session token")]
    Missing,
    #[error("Malformed kiosk session token")]
    Malformed,
    #[error("Invalid kiosk session token")]
    Invalid,
    #[error("Session token has expired")]
    Expired,
    #[error("Token is not a kiosk session token")]
    WrongType,
    #[error("Failed to sign kiosk session token: {0}")]
    Signing(String),
}

/// Claims carried by a kiosk token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskClaims {
    pub employee_id: i64,
    pub role: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies kiosk tokens with one shared secret.
#[derive(Clone)]
pub struct KioskSessionSigner {
    secret: Option<Vec<u8>>,
}

impl std::fmt::Debug for KioskSessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KioskSessionSigner")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

impl KioskSessionSigner {
    /// Creates a signer. An absent or empty secret leaves kiosk sessions
    /// unavailable.
    #[must_use]
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret
                .filter(|s| !s.is_empty())
                .map(|s| s.as_bytes().to_vec()),
        }
    }

    /// Whether a secret is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&[u8], KioskSessionError> {
        self.secret
            .as_deref()
            .ok_or(KioskSessionError::MissingSecret)
    }

    /// Issues a token for `employee_id`, valid for [`KIOSK_SESSION_TTL`].
    ///
    /// # Errors
    ///
    /// Returns `KioskSessionError::MissingSecret` when unconfigured, or
    /// `Signing` if encoding fails.
    pub fn issue(
        &self,
        employee_id: i64,
        role: &str,
        now: OffsetDateTime,
    ) -> Result<String, KioskSessionError> {
        let claims: KioskClaims = KioskClaims {
            employee_id,
            role: role.to_string(),
            token_type: KIOSK_TOKEN_TYPE.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + KIOSK_SESSION_TTL).unix_timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret()?),
        )
        .map_err(|e| KioskSessionError::Signing(e.to_string()))
    }

    /// Verifies a token against `now` and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `Expired` once `exp` has passed, `WrongType` for tokens not
    /// minted for the kiosk, and `Invalid` or `Malformed` otherwise.
    pub fn verify(&self, token: &str, now: OffsetDateTime) -> Result<KioskClaims, KioskSessionError> {
        if token.is_empty() {
            return Err(KioskSessionError::Missing);
        }

        // Expiry is checked against the injected instant below.
        let mut validation: Validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims: KioskClaims = decode::<KioskClaims>(
            token,
            &DecodingKey::from_secret(self.secret()?),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidToken
            | jsonwebtoken::errors::ErrorKind::Base64(_)
            | jsonwebtoken::errors::ErrorKind::Json(_)
            | jsonwebtoken::errors::ErrorKind::Utf8(_) => KioskSessionError::Malformed,
            _ => KioskSessionError::Invalid,
        })?
        .claims;

        if claims.token_type != KIOSK_TOKEN_TYPE {
            return Err(KioskSessionError::WrongType);
        }
        if claims.exp <= now.unix_timestamp() {
            return Err(KioskSessionError::Expired);
        }

        Ok(claims)
    }
}

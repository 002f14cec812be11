//! Authentication service for the authoring API.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use serde_json::json;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Checks bearer tokens against the configured admin token.
///
/// Both sides are MACed with a per-process random key and compared with
/// [`Mac::verify_slice`], so comparison time does not depend on how many
/// leading bytes match.
pub struct AuthService {
    key: [u8; 32],
    expected: Vec<u8>,
}

impl AuthService {
    /// Creates a new authentication service for `admin_token`.
    pub fn new(admin_token: &str) -> Self {
        let mut key = [0u8; 32];
        rand::rng().fill_bytes(&mut key);
        let expected = Self::mac(&key, admin_token).finalize().into_bytes().to_vec();
        Self { key, expected }
    }

    fn mac(key: &[u8], token: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        mac
    }

    /// Authenticates a raw bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        Self::mac(&self.key, token)
            .verify_slice(&self.expected)
            .map_err(|_| {
                AppError::unauthorized("Unauthorized", json!({"reason": "Invalid token"}))
            })
    }
}

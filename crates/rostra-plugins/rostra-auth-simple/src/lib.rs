//! # rostra-auth-simple
//!
//! Salted-digest implementation of `AuthProvider`. The token is
//! `user_id.name_b64.signature` where the signature is a truncated
//! SHA-256 over the salt and both fields. This stands in for a real
//! session system: the core only ever asks whether a request carries a
//! verifiable identity.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rostra_core::models::Identity;
use rostra_core::traits::AuthProvider;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub struct SimpleAuthProvider {
    /// Secret salt; tokens do not survive a salt rotation.
    session_salt: String,
}

impl SimpleAuthProvider {
    /// Accepts a salt string (e.g., from configuration).
    pub fn new(salt: &str) -> Self {
        Self {
            session_salt: salt.to_string(),
        }
    }

    fn signature(&self, user_id: &str, name_b64: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.session_salt.as_bytes());
        hasher.update(user_id.as_bytes());
        hasher.update(name_b64.as_bytes());
        let hash = hex::encode(hasher.finalize());
        hash[..32].to_string()
    }
}

impl AuthProvider for SimpleAuthProvider {
    fn authenticate(&self, token: &str) -> Option<Identity> {
        let mut parts = token.splitn(3, '.');
        let user_id = parts.next()?;
        let name_b64 = parts.next()?;
        let signature = parts.next()?;
        if self.signature(user_id, name_b64) != signature {
            return None;
        }
        let user_id = Uuid::parse_str(user_id).ok()?;
        let name_bytes = URL_SAFE_NO_PAD.decode(name_b64).ok()?;
        let display_name = String::from_utf8(name_bytes).ok()?;
        Some(Identity {
            user_id,
            display_name,
        })
    }

    fn issue_token(&self, identity: &Identity) -> String {
        let user_id = identity.user_id.to_string();
        let name_b64 = URL_SAFE_NO_PAD.encode(identity.display_name.as_bytes());
        let signature = self.signature(&user_id, &name_b64);
        format!("{user_id}.{name_b64}.{signature}")
    }
}

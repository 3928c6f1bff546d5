//! Capability tokens — bearer access to individual trades
//!
//! A token binds read/write access to exactly one trade without any
//! central access-control lookup: it carries a SHA-256 digest of the UTI
//! and the ledger identity's Ed25519 signature, so a holder can prove the
//! token was issued for that trade by that ledger.
//!
//! Layout (104 bytes, base64-encoded on the wire):
//!
//! ```text
//! [ 0..32)  SHA-256 digest of the UTI
//! [32..40)  reserved (zero; an expiry would live here)
//! [40..104) Ed25519 signature over bytes [0..40)
//! ```
//!
//! Ledger call sites authorize with a plain byte-equality bearer check
//! against the stored token; [`verify_token`] is the defense-in-depth
//! primitive for contexts where the token crosses a trust boundary the
//! ledger does not control.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use sha2::{Digest, Sha256};
use types::ids::Uti;

pub use ed25519_dalek::VerifyingKey;

/// Length of the UTI digest prefix.
pub const UTI_DIGEST_LEN: usize = 32;

/// Reserved trailer of the token body (unenforced expiry slot).
pub const RESERVED_LEN: usize = 8;

/// Length of the signed token body.
pub const TOKEN_BODY_LEN: usize = UTI_DIGEST_LEN + RESERVED_LEN;

/// Total decoded token length (body + Ed25519 signature).
pub const TOKEN_LEN: usize = TOKEN_BODY_LEN + ed25519_dalek::SIGNATURE_LENGTH;

/// Token verification errors. Verification fails closed: any length,
/// digest, or signature mismatch rejects the token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is not valid base64")]
    InvalidEncoding,

    #[error("token length is invalid: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("token refers to the wrong trade (digest {actual} != expected {expected})")]
    WrongTrade { expected: String, actual: String },

    #[error("token signature is invalid")]
    InvalidSignature,
}

/// The ledger's signing identity.
///
/// Wraps an Ed25519 keypair; the private half never leaves this type.
#[derive(Debug, Clone)]
pub struct ServerIdentity {
    signing_key: SigningKey,
}

impl ServerIdentity {
    /// Build from a 32-byte seed. Deterministic: the same seed always
    /// yields the same keypair.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Generate a fresh identity from OS randomness.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Public verification key for out-of-band token holders.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign arbitrary bytes with the identity key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

/// SHA-256 digest of a UTI, the token's trade-binding prefix.
pub fn uti_digest(uti: &Uti) -> [u8; UTI_DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(uti.as_bytes());
    hasher.finalize().into()
}

/// Issue the capability token for a trade.
///
/// Called once, at trade creation, by the ledger's signing identity. The
/// returned string is the bearer capability: it is stored on the trade and
/// handed to the submitter, and is not re-derivable by a caller.
pub fn issue_token(identity: &ServerIdentity, uti: &Uti) -> String {
    let mut body = [0u8; TOKEN_BODY_LEN];
    body[..UTI_DIGEST_LEN].copy_from_slice(&uti_digest(uti));
    // [UTI_DIGEST_LEN..] stays zero: reserved for an expiry.

    let signature = identity.sign(&body);

    let mut token = Vec::with_capacity(TOKEN_LEN);
    token.extend_from_slice(&body);
    token.extend_from_slice(&signature.to_bytes());
    BASE64.encode(token)
}

/// Fully verify a token against a UTI and the issuer's public key.
///
/// Checks, in order: base64 decoding, total length, UTI digest, and the
/// signature over the token body.
pub fn verify_token(
    issuer: &VerifyingKey,
    uti: &Uti,
    token_b64: &str,
) -> Result<(), TokenError> {
    let token = BASE64
        .decode(token_b64)
        .map_err(|_| TokenError::InvalidEncoding)?;

    if token.len() != TOKEN_LEN {
        return Err(TokenError::InvalidLength {
            expected: TOKEN_LEN,
            actual: token.len(),
        });
    }

    let expected_digest = uti_digest(uti);
    if token[..UTI_DIGEST_LEN] != expected_digest {
        return Err(TokenError::WrongTrade {
            expected: hex::encode(expected_digest),
            actual: hex::encode(&token[..UTI_DIGEST_LEN]),
        });
    }

    let body = &token[..TOKEN_BODY_LEN];
    let sig_bytes: [u8; ed25519_dalek::SIGNATURE_LENGTH] = token[TOKEN_BODY_LEN..]
        .try_into()
        .map_err(|_| TokenError::InvalidSignature)?;
    let signature = Signature::from_bytes(&sig_bytes);

    issuer
        .verify(body, &signature)
        .map_err(|_| TokenError::InvalidSignature)
}

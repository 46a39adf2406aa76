//! Unauthenticated ephemeral X25519 key exchange.
//!
//! There is no identity key and no certificate: the two peers are assumed to
//! be physically paired by the operator (trust-on-first-pairing), and this
//! exchange only needs to produce a shared secret neither a passive observer
//! nor a later-arriving third party can derive. Public keys are exchanged in
//! the clear over the serial link by the protocol layer.

use x25519_dalek::{EphemeralSecret, PublicKey};
use zeroize::Zeroizing;

use crate::kdf::derive_root_key;
use crate::{Error, Result};

/// A freshly generated X25519 keypair, consumed exactly once by
/// [`EphemeralKeypair::diffie_hellman`].
pub struct EphemeralKeypair {
    secret: EphemeralSecret,
    public: PublicKey,
}

/// The 32-byte root key `K` derived from the shared secret, zeroized on drop.
pub struct SharedSecret(Zeroizing<[u8; 32]>);

impl EphemeralKeypair {
    /// Generate a new ephemeral keypair using the operating system's CSPRNG.
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random_from_rng(rand::rngs::OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// The public half to send to the peer.
    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// Consume this keypair and the peer's public key to derive the shared
    /// root key via X25519 followed by HKDF-SHA256.
    pub fn diffie_hellman(self, their_public: &PublicKey) -> Result<SharedSecret> {
        let shared = self.secret.diffie_hellman(their_public);
        if shared.as_bytes().iter().all(|&b| b == 0) {
            // Low-order point: x25519-dalek's check-on-contrails, kept explicit
            // since this handshake has no other authentication to fall back on.
            return Err(Error::Handshake(
                "shared secret is the all-zero contributory point".into(),
            ));
        }
        let root_key = derive_root_key(shared.as_bytes())?;
        Ok(SharedSecret(Zeroizing::new(root_key)))
    }
}

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

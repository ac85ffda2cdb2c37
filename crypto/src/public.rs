use crate::{
    address::Address,
    error::{Error, Result},
    traits::PubKey,
    wire::{self, PUB_KEY_NAME, PUB_KEY_TAG},
    PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    any::Any,
    convert::TryFrom,
    fmt::{self, Debug, Display},
};

/// An Ed25519 public key, which also serves as identifier for the corresponding private key
///
/// It consists of the 32 octets of the compressed curve point, the same bytes as the underlying
/// `ed25519_dalek::PublicKey`. Nothing secret is held, so equality is a plain byte comparison
/// and the key is freely copyable.
///
/// The bytes are not checked to be a valid curve point when constructing from untrusted input;
/// such a key simply never verifies anything.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct PublicKey(pub(crate) [u8; PUBLIC_KEY_LENGTH]);

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKeyEd25519{{{}}}", hex::encode_upper(self.0))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(Error::invalid_length("public key", PUBLIC_KEY_LENGTH, bytes.len()));
        }
        let mut res = [0u8; PUBLIC_KEY_LENGTH];
        res.copy_from_slice(bytes);
        Ok(Self(res))
    }

    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0
    }

    /// Gets the underlying ed25519 public key for interop with rust crypto libs
    ///
    /// Fails if the bytes do not describe a point on the curve.
    pub fn to_ed25519(self) -> Result<ed25519_dalek::PublicKey> {
        ed25519_dalek::PublicKey::from_bytes(&self.0).map_err(|_| Error::InvalidPublicKey)
    }

    /// The SHA256 of the key bytes, truncated to 20 bytes.
    pub fn address(&self) -> Address {
        Address(crate::hash::sum_truncated(&self.0))
    }

    /// Check a signature over `message`.
    ///
    /// Malformed input (a signature not exactly 64 bytes long, or key bytes that are not a curve
    /// point) is reported just like a signature mismatch, by returning `false`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        if signature.len() != SIGNATURE_LENGTH {
            tracing::trace!(len = signature.len(), "signature has wrong length");
            return false;
        }
        let signature = if let Ok(sig) = ed25519_dalek::Signature::try_from(signature) {
            sig
        } else {
            tracing::trace!("signature is not canonical");
            return false;
        };
        let key = if let Ok(key) = self.to_ed25519() {
            key
        } else {
            tracing::trace!(key = %self, "public key is not a curve point");
            return false;
        };
        use ed25519_dalek::Verifier;
        let verified = key.verify(message, &signature).is_ok();
        if !verified {
            tracing::trace!(key = %self, "signature mismatch");
        }
        verified
    }

    /// Type-tagged binary encoding, see [`wire`](crate::wire).
    pub fn to_wire(&self) -> Vec<u8> {
        PUB_KEY_TAG.encode(&self.0)
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(PUB_KEY_TAG.decode(bytes)?)
    }
}

impl From<ed25519_dalek::PublicKey> for PublicKey {
    fn from(key: ed25519_dalek::PublicKey) -> Self {
        Self(key.to_bytes())
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;
    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PubKey for PublicKey {
    fn address(&self) -> Address {
        PublicKey::address(self)
    }
    fn to_wire(&self) -> Vec<u8> {
        PublicKey::to_wire(self)
    }
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        PublicKey::verify(self, message, signature)
    }
    fn equals(&self, other: &dyn PubKey) -> bool {
        other.as_any().downcast_ref::<PublicKey>() == Some(self)
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        wire::serialize_tagged(PUB_KEY_NAME, &self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = wire::deserialize_tagged(PUB_KEY_NAME, deserializer)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "arb"))]
impl quickcheck::Arbitrary for PublicKey {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut seed = [0u8; crate::SEED_LENGTH];
        for b in seed.iter_mut() {
            *b = quickcheck::Arbitrary::arbitrary(g);
        }
        Self(crate::private::derive_public(&seed))
    }
}

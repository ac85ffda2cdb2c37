use crate::{
    error::{Error, Result},
    SIGNATURE_LENGTH,
};
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    convert::TryFrom,
    fmt::{self, Debug, Display},
};

/// An Ed25519 signature as produced by [`PrivateKey::sign`](crate::PrivateKey::sign).
///
/// Verification takes plain byte slices, so a `Signature` is merely a convenient owned form of
/// the 64 octets; it carries no guarantee of being valid for anything.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Signature(pub(crate) [u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn to_bytes(self) -> [u8; SIGNATURE_LENGTH] {
        self.0
    }
}

impl From<ed25519_dalek::Signature> for Signature {
    fn from(sig: ed25519_dalek::Signature) -> Self {
        Self(sig.to_bytes())
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;
    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(Error::invalid_length("signature", SIGNATURE_LENGTH, bytes.len()));
        }
        let mut res = [0u8; SIGNATURE_LENGTH];
        res.copy_from_slice(bytes);
        Ok(Self(res))
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base64::encode(self.0))
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Signature;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("base64 encoded Signature")
            }
            fn visit_str<E: serde::de::Error>(self, string: &str) -> Result<Self::Value, E> {
                let bytes = base64::decode(string).map_err(serde::de::Error::custom)?;
                Signature::try_from(&bytes[..]).map_err(serde::de::Error::custom)
            }
        }
        deserializer.deserialize_str(V)
    }
}

use crate::{
    error::{Error, Result},
    hash, ADDRESS_LENGTH, PUBLIC_KEY_LENGTH,
};
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    convert::TryFrom,
    fmt::{self, Debug, Display},
    str::FromStr,
};

/// Short identifier of a public key: the SHA256 of the raw key bytes, truncated to 20 bytes.
///
/// Addresses are always recomputed from the key, see [`PublicKey::address`](crate::PublicKey::address).
/// They are rendered and parsed as uppercase hex.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Address(pub(crate) [u8; ADDRESS_LENGTH]);

impl Address {
    /// Derive the address of raw public key bytes, which must be exactly 32 bytes long.
    pub fn from_pub_key_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(Error::invalid_length("public key", PUBLIC_KEY_LENGTH, bytes.len()));
        }
        Ok(Self(hash::sum_truncated(bytes)))
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Error;
    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ADDRESS_LENGTH {
            return Err(Error::invalid_length("address", ADDRESS_LENGTH, bytes.len()));
        }
        let mut res = [0u8; ADDRESS_LENGTH];
        res.copy_from_slice(bytes);
        Ok(Self(res))
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| Error::InvalidHex { reason: e.to_string() })?;
        Self::try_from(&bytes[..])
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Address;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("hex encoded Address")
            }
            fn visit_str<E: serde::de::Error>(self, string: &str) -> Result<Self::Value, E> {
                Address::from_str(string).map_err(serde::de::Error::custom)
            }
        }
        deserializer.deserialize_str(V)
    }
}

#[cfg(any(test, feature = "arb"))]
impl quickcheck::Arbitrary for Address {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut res = [0u8; ADDRESS_LENGTH];
        for b in res.iter_mut() {
            *b = quickcheck::Arbitrary::arbitrary(g);
        }
        Self(res)
    }
}

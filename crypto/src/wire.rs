//! Type-tagged encodings for key material.
//!
//! Binary form, used when keys cross a process boundary or are persisted:
//!
//!  - 4 bytes prefix, derived from the registered type name
//!  - uvarint length of the raw key bytes (always a single octet for the sizes used here)
//!  - raw key bytes
//!
//! The prefix is computed by hashing the type name with SHA256, dropping leading zero octets,
//! skipping three disambiguation octets, dropping leading zero octets again and then taking the
//! next four octets. For the two Ed25519 types this yields
//!
//!  - `tendermint/PrivKeyEd25519`: `A3 28 89 10`, length `0x40`
//!  - `tendermint/PubKeyEd25519`: `16 24 DE 64`, length `0x20`
//!
//! Human-readable form, used through serde: `{"type": <name>, "value": <base64 raw bytes>}`.

use crate::{
    error::{Error, Result},
    hash,
};
use byteorder::ReadBytesExt;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    borrow::Cow,
    io::{Cursor, Read},
};

/// Registered type name of an Ed25519 private key.
pub const PRIV_KEY_NAME: &str = "tendermint/PrivKeyEd25519";
/// Registered type name of an Ed25519 public key.
pub const PUB_KEY_NAME: &str = "tendermint/PubKeyEd25519";

pub(crate) const PRIV_KEY_PREFIX: [u8; 4] = [0xa3, 0x28, 0x89, 0x10];
pub(crate) const PUB_KEY_PREFIX: [u8; 4] = [0x16, 0x24, 0xde, 0x64];

/// Computes the 4-byte binary prefix registered for the given type name.
pub fn name_prefix(name: &str) -> [u8; 4] {
    let digest = hash::sha256(name.as_bytes());
    let mut bytes = digest
        .iter()
        .copied()
        .skip_while(|b| *b == 0)
        .skip(3)
        .skip_while(|b| *b == 0);
    let mut prefix = [0u8; 4];
    for b in prefix.iter_mut() {
        // a SHA256 digest with fewer than eight non-zero octets does not occur for real names
        *b = bytes.next().unwrap_or_default();
    }
    prefix
}

/// A key type known to the binary codec.
pub(crate) struct Tag {
    pub name: &'static str,
    pub prefix: [u8; 4],
    pub len: usize,
}

pub(crate) const PRIV_KEY_TAG: Tag = Tag {
    name: PRIV_KEY_NAME,
    prefix: PRIV_KEY_PREFIX,
    len: crate::PRIVATE_KEY_LENGTH,
};

pub(crate) const PUB_KEY_TAG: Tag = Tag {
    name: PUB_KEY_NAME,
    prefix: PUB_KEY_PREFIX,
    len: crate::PUBLIC_KEY_LENGTH,
};

impl Tag {
    pub fn encode(&self, raw: &[u8]) -> Vec<u8> {
        debug_assert_eq!(raw.len(), self.len);
        let mut out = Vec::with_capacity(self.prefix.len() + 1 + raw.len());
        out.extend_from_slice(&self.prefix);
        // lengths below 0x80 are their own uvarint
        out.push(self.len as u8);
        out.extend_from_slice(raw);
        out
    }

    /// Strips and checks prefix and length, returning the raw key bytes.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        let mut cursor = Cursor::new(bytes);
        let mut prefix = [0u8; 4];
        if cursor.read_exact(&mut prefix).is_err() || prefix != self.prefix {
            let found = hex::encode_upper(&bytes[..bytes.len().min(4)]);
            tracing::debug!(expected = self.name, %found, "rejecting key with foreign prefix");
            return Err(Error::UnknownKeyType { found });
        }
        let len = cursor
            .read_u8()
            .map_err(|_| Error::invalid_length("encoded key", self.len + 5, bytes.len()))?;
        if len as usize != self.len {
            return Err(Error::invalid_length(self.name, self.len, len as usize));
        }
        let raw = &bytes[cursor.position() as usize..];
        if raw.len() != self.len {
            return Err(Error::invalid_length(self.name, self.len, raw.len()));
        }
        Ok(raw)
    }
}

#[derive(Serialize, Deserialize)]
struct Tagged<'a> {
    #[serde(rename = "type", default)]
    kind: Option<Cow<'a, str>>,
    value: Cow<'a, str>,
}

pub(crate) fn serialize_tagged<S: Serializer>(
    name: &'static str,
    raw: &[u8],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Tagged {
        kind: Some(Cow::Borrowed(name)),
        value: Cow::Owned(base64::encode(raw)),
    }
    .serialize(serializer)
}

/// Reads the human-readable form and returns the raw key bytes if the type name matches.
pub(crate) fn deserialize_tagged<'de, D: Deserializer<'de>>(
    name: &'static str,
    deserializer: D,
) -> Result<Vec<u8>, D::Error> {
    let tagged = Tagged::deserialize(deserializer)?;
    let kind = tagged.kind.unwrap_or(Cow::Borrowed("<none>"));
    if kind != name {
        tracing::debug!(expected = name, found = %kind, "rejecting key with foreign type");
        return Err(de::Error::custom(Error::UnknownKeyType {
            found: kind.into_owned(),
        }));
    }
    base64::decode(tagged.value.as_bytes()).map_err(de::Error::custom)
}

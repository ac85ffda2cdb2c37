use derive_more::{Display, Error};

/// Everything that can go wrong when constructing, decoding or using key material.
///
/// A signature that does not verify is not an error, see [`PublicKey::verify`](crate::PublicKey::verify).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum Error {
    #[display(fmt = "entropy source could not supply a seed: {}", reason)]
    EntropyUnavailable { reason: String },
    #[display(fmt = "private key does not carry its public key (trailing bytes are all zero)")]
    UninitializedKey,
    #[display(fmt = "invalid {} length: expected {} bytes, received {}", what, expected, actual)]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[display(fmt = "unknown key type {}", found)]
    UnknownKeyType { found: String },
    #[display(fmt = "cached public key does not match the private key seed")]
    KeyMismatch,
    #[display(fmt = "public key bytes are not a valid curve point")]
    InvalidPublicKey,
    #[display(fmt = "invalid hex: {}", reason)]
    InvalidHex { reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid_length(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength { what, expected, actual }
    }
}

//! Ed25519 key material for the consensus engine
//!
//! Validators and nodes are identified by Ed25519 key pairs. This crate wraps the raw key bytes
//! into types that uphold the layout invariants and produce the encodings other nodes expect:
//!
//!  - [`PrivateKey`]: 64 bytes, seed followed by the cached public key; signs messages
//!  - [`PublicKey`]: 32 bytes; verifies signatures and derives the [`Address`]
//!  - [`Address`]: SHA256 of the public key, truncated to 20 bytes
//!  - [`Signature`]: 64 bytes
//!
//! # Assumptions
//!
//! ## Handling of key material
//!
//! Private keys are zeroed when their memory is released and compared in constant time. Signing
//! and verification are delegated to `ed25519_dalek`, whose arithmetic does not branch on secret
//! data.
//!
//! Malformed input (wrong lengths, uninitialized keys, foreign type tags) is reported through
//! [`Error`], never by panicking. The one exception to this rule is signature verification, which
//! answers `false` for anything that is not a valid signature, malformed or not.
//!
//! ## Entropy
//!
//! Key generation reads from an explicitly passed [`rand::RngCore`] + [`rand::CryptoRng`];
//! [`PrivateKey::generate`] is a shorthand for using the operating system's source.
//!
//! # Encoding
//!
//! Keys crossing a process boundary are bound to their type name, see [`wire`].

mod address;
mod error;
pub mod hash;
mod private;
mod public;
mod signature;
mod traits;
pub mod wire;

pub use address::Address;
pub use error::{Error, Result};
pub use private::{constant_time_eq, PrivateKey};
pub use public::PublicKey;
pub use signature::Signature;
pub use traits::{PrivKey, PubKey};
pub use wire::{PRIV_KEY_NAME, PUB_KEY_NAME};

/// Length of the secret seed a key pair is derived from.
pub const SEED_LENGTH: usize = 32;
/// Length of a public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Length of a private key: seed followed by public key.
pub const PRIVATE_KEY_LENGTH: usize = SEED_LENGTH + PUBLIC_KEY_LENGTH;
/// Length of a signature.
pub const SIGNATURE_LENGTH: usize = 64;
/// Length of an address.
pub const ADDRESS_LENGTH: usize = hash::TRUNCATED_SIZE;

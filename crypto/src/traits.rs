//! Scheme-agnostic views on key material.
//!
//! Consensus code holds validator and node keys as `Box<dyn PubKey>` / `Box<dyn PrivKey>` so that
//! further signature schemes can be added without touching callers. Two keys of different schemes
//! never compare equal.

use crate::{error::Result, signature::Signature, Address};
use std::{
    any::Any,
    fmt::{Debug, Display},
};

pub trait PrivKey: Send + Sync + 'static {
    /// Type-tagged binary encoding.
    fn to_wire(&self) -> Vec<u8>;
    fn sign(&self, message: &[u8]) -> Result<Signature>;
    fn pub_key(&self) -> Result<Box<dyn PubKey>>;
    /// Constant-time comparison; `false` for keys of another scheme.
    fn equals(&self, other: &dyn PrivKey) -> bool;
    fn as_any(&self) -> &dyn Any;
}

pub trait PubKey: Debug + Display + Send + Sync + 'static {
    fn address(&self) -> Address;
    /// Type-tagged binary encoding.
    fn to_wire(&self) -> Vec<u8>;
    /// Never fails, malformed signatures are reported as `false`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;
    /// Byte-exact comparison; `false` for keys of another scheme.
    fn equals(&self, other: &dyn PubKey) -> bool;
    fn as_any(&self) -> &dyn Any;
}

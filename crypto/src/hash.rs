//! SHA256 helpers used for secret-derived seeds and for addresses.

use sha2::{Digest, Sha256};

/// Width of a full SHA256 digest.
pub const SIZE: usize = 32;
/// Width of a truncated digest, which is what addresses are made of.
pub const TRUNCATED_SIZE: usize = 20;

pub fn sha256(bytes: &[u8]) -> [u8; SIZE] {
    let mut res = [0u8; SIZE];
    res.copy_from_slice(&Sha256::digest(bytes));
    res
}

/// The first [`TRUNCATED_SIZE`] bytes of the SHA256 of the input.
pub fn sum_truncated(bytes: &[u8]) -> [u8; TRUNCATED_SIZE] {
    let mut res = [0u8; TRUNCATED_SIZE];
    res.copy_from_slice(&Sha256::digest(bytes)[..TRUNCATED_SIZE]);
    res
}

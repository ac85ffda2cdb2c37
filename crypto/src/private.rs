use crate::{
    error::{Error, Result},
    hash,
    public::PublicKey,
    signature::Signature,
    traits::{PrivKey, PubKey},
    wire::{self, PRIV_KEY_NAME, PRIV_KEY_TAG},
    PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SEED_LENGTH,
};
use ed25519_dalek::ExpandedSecretKey;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    any::Any,
    fmt::{self, Debug},
};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// An Ed25519 private key.
///
/// The 64 bytes are the 32 byte seed followed by the 32 byte public key derived from it, which is
/// the layout used by most Ed25519 libraries for "expanded" key pairs. Caching the public half
/// saves a scalar multiplication on every signature, at the price of an invariant: the trailing
/// bytes must match the seed. All constructors establish this, except that a key whose trailing
/// bytes are all zero is accepted as *uninitialized*; such a key fails every operation that needs
/// the public key.
///
/// The buffer is zeroed when the key is dropped, `Debug` does not print it, and `==` runs in
/// constant time.
#[derive(Clone)]
pub struct PrivateKey(pub(crate) [u8; PRIVATE_KEY_LENGTH]);

/// Equality of two byte strings in time depending only on their lengths.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    bool::from(a.ct_eq(b))
}

// seeds are always SEED_LENGTH bytes, for which from_bytes cannot fail
fn secret_key(seed: &[u8]) -> ed25519_dalek::SecretKey {
    ed25519_dalek::SecretKey::from_bytes(seed).expect("wrong seed length for ed25519_dalek::SecretKey")
}

pub(crate) fn derive_public(seed: &[u8]) -> [u8; PUBLIC_KEY_LENGTH] {
    let secret = secret_key(seed);
    ed25519_dalek::PublicKey::from(&secret).to_bytes()
}

impl PrivateKey {
    /// Generate a fresh key from the operating system's entropy source.
    pub fn generate() -> Result<Self> {
        Self::generate_from(&mut OsRng)
    }

    /// Generate a fresh key, reading the 32 byte seed from the given entropy source.
    ///
    /// A failing source aborts the generation, there is no retry.
    pub fn generate_from<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let mut seed = [0u8; SEED_LENGTH];
        if let Err(e) = rng.try_fill_bytes(&mut seed) {
            seed.zeroize();
            return Err(Error::EntropyUnavailable { reason: e.to_string() });
        }
        let key = Self::from_seed(seed);
        seed.zeroize();
        tracing::debug!(public = %key.cached_public(), "generated private key");
        Ok(key)
    }

    /// Deterministically derive the key pair for the given seed.
    pub fn from_seed(seed: [u8; SEED_LENGTH]) -> Self {
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        bytes[..SEED_LENGTH].copy_from_slice(&seed);
        bytes[SEED_LENGTH..].copy_from_slice(&derive_public(&seed));
        let key = Self(bytes);
        bytes.zeroize();
        key
    }

    /// Derive a key from the SHA256 of the given secret.
    ///
    /// No key stretching happens here: if the secret stems from user input, pass it through a
    /// slow KDF (bcrypt, scrypt, argon2) first.
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut seed = hash::sha256(secret);
        let key = Self::from_seed(seed);
        seed.zeroize();
        tracing::debug!(public = %key.cached_public(), "derived private key from secret");
        key
    }

    /// Read the raw 64 byte layout, checking that the public half belongs to the seed.
    ///
    /// A key with an all-zero public half is accepted as uninitialized.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(Error::invalid_length("private key", PRIVATE_KEY_LENGTH, bytes.len()));
        }
        let mut res = [0u8; PRIVATE_KEY_LENGTH];
        res.copy_from_slice(bytes);
        let key = Self(res);
        res.zeroize();
        if key.is_initialized() && derive_public(key.seed()) != key.0[SEED_LENGTH..] {
            return Err(Error::KeyMismatch);
        }
        Ok(key)
    }

    /// The raw 64 byte layout: seed followed by public key.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.0
    }

    /// Type-tagged binary encoding, see [`wire`](crate::wire).
    pub fn to_wire(&self) -> Vec<u8> {
        PRIV_KEY_TAG.encode(&self.0)
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(PRIV_KEY_TAG.decode(bytes)?)
    }

    /// `false` if the public half of the key is all zeros.
    pub fn is_initialized(&self) -> bool {
        self.0[SEED_LENGTH..].iter().any(|b| *b != 0)
    }

    /// The public key cached in the trailing 32 bytes.
    pub fn pub_key(&self) -> Result<PublicKey> {
        if !self.is_initialized() {
            return Err(Error::UninitializedKey);
        }
        Ok(self.cached_public())
    }

    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let public = self.pub_key()?.to_ed25519()?;
        let secret = secret_key(self.seed());
        Ok(ExpandedSecretKey::from(&secret).sign(message, &public).into())
    }

    /// Compares the full key material in constant time.
    pub fn ct_eq(&self, other: &PrivateKey) -> bool {
        constant_time_eq(&self.0, &other.0)
    }

    fn seed(&self) -> &[u8] {
        &self.0[..SEED_LENGTH]
    }

    fn cached_public(&self) -> PublicKey {
        let mut public = [0u8; PUBLIC_KEY_LENGTH];
        public.copy_from_slice(&self.0[SEED_LENGTH..]);
        PublicKey(public)
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}
impl Eq for PrivateKey {}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secret")
    }
}

impl PrivKey for PrivateKey {
    fn to_wire(&self) -> Vec<u8> {
        PrivateKey::to_wire(self)
    }
    fn sign(&self, message: &[u8]) -> Result<Signature> {
        PrivateKey::sign(self, message)
    }
    fn pub_key(&self) -> Result<Box<dyn PubKey>> {
        Ok(Box::new(PrivateKey::pub_key(self)?))
    }
    fn equals(&self, other: &dyn PrivKey) -> bool {
        match other.as_any().downcast_ref::<PrivateKey>() {
            Some(other) => self.ct_eq(other),
            None => false,
        }
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Serialize for PrivateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        wire::serialize_tagged(PRIV_KEY_NAME, &self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut bytes = wire::deserialize_tagged(PRIV_KEY_NAME, deserializer)?;
        let res = Self::from_bytes(&bytes);
        bytes.zeroize();
        res.map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "arb"))]
impl quickcheck::Arbitrary for PrivateKey {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut seed = [0u8; SEED_LENGTH];
        for b in seed.iter_mut() {
            *b = quickcheck::Arbitrary::arbitrary(g);
        }
        Self::from_seed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;
    use rand::{rngs::StdRng, SeedableRng};
    use std::convert::TryFrom;

    struct Exhausted;
    impl RngCore for Exhausted {
        fn next_u32(&mut self) -> u32 {
            unimplemented!()
        }
        fn next_u64(&mut self) -> u64 {
            unimplemented!()
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unimplemented!()
        }
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy pool drained",
            )))
        }
    }
    impl CryptoRng for Exhausted {}

    /// Some foreign key type, standing in for another signature scheme.
    struct OtherScheme([u8; PRIVATE_KEY_LENGTH]);
    impl PrivKey for OtherScheme {
        fn to_wire(&self) -> Vec<u8> {
            self.0.to_vec()
        }
        fn sign(&self, _message: &[u8]) -> Result<Signature> {
            Err(Error::UninitializedKey)
        }
        fn pub_key(&self) -> Result<Box<dyn PubKey>> {
            Err(Error::UninitializedKey)
        }
        fn equals(&self, _other: &dyn PrivKey) -> bool {
            false
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn h(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn must_match_rfc8032_vector() {
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&h("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"));
        let key = PrivateKey::from_seed(seed);
        assert_eq!(
            key.pub_key().unwrap().to_bytes().to_vec(),
            h("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a")
        );
        assert_eq!(
            key.sign(b"").unwrap().to_bytes().to_vec(),
            h("e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b")
        );
    }

    #[test]
    fn must_generate_from_injected_entropy() {
        let a = PrivateKey::generate_from(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = PrivateKey::generate_from(&mut StdRng::seed_from_u64(7)).unwrap();
        let c = PrivateKey::generate_from(&mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.pub_key().unwrap().as_ref(), &a.to_bytes()[32..]);
        assert!(PrivateKey::generate().unwrap().is_initialized());
    }

    #[test]
    fn must_fail_without_entropy() {
        assert_eq!(
            PrivateKey::generate_from(&mut Exhausted).unwrap_err(),
            Error::EntropyUnavailable {
                reason: "entropy pool drained".to_owned()
            }
        );
    }

    #[test]
    fn must_derive_from_secret_deterministically() {
        let a = PrivateKey::from_secret(b"correct horse battery staple");
        let b = PrivateKey::from_secret(b"correct horse battery staple");
        assert_eq!(a.to_bytes().len(), 64);
        assert_eq!(a.to_bytes()[..], b.to_bytes()[..]);
        assert_ne!(a, PrivateKey::from_secret(b"correct horse battery stapler"));
        assert_eq!(a.to_bytes()[..32], hash::sha256(b"correct horse battery staple")[..]);
    }

    #[test]
    fn must_refuse_uninitialized_key() {
        let mut raw = PrivateKey::from_secret(b"x").to_bytes();
        for b in raw[32..].iter_mut() {
            *b = 0;
        }
        let key = PrivateKey::from_bytes(&raw).unwrap();
        assert!(!key.is_initialized());
        assert_eq!(key.pub_key().unwrap_err(), Error::UninitializedKey);
        assert_eq!(key.sign(b"hello").unwrap_err(), Error::UninitializedKey);
        assert!(PrivKey::pub_key(&key).is_err());
    }

    #[test]
    fn must_refuse_cached_half_off_curve() {
        let mut raw = PrivateKey::from_secret(b"x").to_bytes();
        for b in raw[32..].iter_mut() {
            *b = 0;
        }
        // y = 2 has no matching x on the curve
        raw[32] = 2;
        let key = PrivateKey(raw);
        assert_eq!(key.sign(b"hello").unwrap_err(), Error::InvalidPublicKey);
    }

    #[test]
    fn must_reject_malformed_raw_keys() {
        let mut raw = PrivateKey::from_secret(b"x").to_bytes();
        raw[63] ^= 1;
        assert_eq!(PrivateKey::from_bytes(&raw).unwrap_err(), Error::KeyMismatch);
        assert_eq!(
            PrivateKey::from_bytes(&raw[..32]).unwrap_err(),
            Error::InvalidLength {
                what: "private key",
                expected: 64,
                actual: 32
            }
        );
    }

    #[test]
    fn must_compare_in_constant_time() {
        let a = PrivateKey::from_secret(b"a");
        let b = PrivateKey::from_secret(b"b");
        assert!(a.ct_eq(&a));
        assert!(a.ct_eq(&a.clone()));
        assert!(!a.ct_eq(&b) && !b.ct_eq(&a));
        assert!(PrivKey::equals(&a, &a.clone()));
        assert!(!PrivKey::equals(&a, &OtherScheme(a.to_bytes())));
        assert!(!constant_time_eq(&a.to_bytes(), &a.to_bytes()[..63]));
        assert!(!constant_time_eq(&[], &[0]));
        assert!(constant_time_eq(&[], &[]));
    }

    #[test]
    fn must_not_leak_in_debug() {
        let key = PrivateKey::from_secret(b"a");
        assert_eq!(format!("{:?}", key), "secret");
    }

    #[test]
    fn must_reject_foreign_wire_prefix() {
        let key = PrivateKey::from_secret(b"a");
        let wire = key.to_wire();
        assert_eq!(hex::encode_upper(&wire[..5]), "A328891040");
        let public_wire = key.pub_key().unwrap().to_wire();
        assert!(matches!(
            PrivateKey::from_wire(&public_wire),
            Err(Error::UnknownKeyType { .. })
        ));
        assert!(matches!(
            PrivateKey::from_wire(&key.to_bytes()),
            Err(Error::UnknownKeyType { .. })
        ));
    }

    #[test]
    fn must_reject_mismatched_key_in_json() {
        let mut raw = PrivateKey::from_secret(b"a").to_bytes();
        raw[40] ^= 0x80;
        let json = format!(
            r#"{{"type":"tendermint/PrivKeyEd25519","value":"{}"}}"#,
            base64::encode(&raw[..])
        );
        let err = serde_json::from_str::<PrivateKey>(&json).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn must_reject_untagged_json() {
        let json = format!(r#"{{"value":"{}"}}"#, base64::encode(&[7u8; 64][..]));
        let err = serde_json::from_str::<PrivateKey>(&json).unwrap_err();
        assert!(err.to_string().contains("unknown key type <none>"));
    }

    quickcheck! {
        fn sign_verify(key: PrivateKey, msg: Vec<u8>) -> bool {
            let sig = key.sign(&msg).unwrap();
            key.pub_key().unwrap().verify(&msg, sig.as_ref())
        }

        fn ct_eq_is_symmetric(a: PrivateKey, b: PrivateKey) -> bool {
            a.ct_eq(&b) == b.ct_eq(&a) && a.ct_eq(&b) == (a.to_bytes()[..] == b.to_bytes()[..])
        }

        fn wire_roundtrip(key: PrivateKey) -> bool {
            let wire = key.to_wire();
            wire.len() == 69 && PrivateKey::from_wire(&wire).unwrap() == key
        }

        fn cbor_roundtrip(key: PrivateKey) -> bool {
            let cbor = serde_cbor::to_vec(&key).unwrap();
            serde_cbor::from_slice::<PrivateKey>(&cbor).unwrap() == key
        }

        fn trait_object_roundtrip(key: PrivateKey, msg: Vec<u8>) -> bool {
            let boxed: Box<dyn PrivKey> = Box::new(key.clone());
            let public = boxed.pub_key().unwrap();
            let sig = boxed.sign(&msg).unwrap();
            public.verify(&msg, sig.as_ref())
                && public.equals(&key.pub_key().unwrap())
                && Signature::try_from(sig.as_ref()).unwrap() == sig
        }
    }
}

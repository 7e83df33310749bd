pub mod key_writer;
pub mod key_reader;
pub mod key_kind;
pub mod key_pair;

pub use key_pair::*;
pub use key_reader::*;
pub use key_writer::*;
pub use key_kind::*;

use lazy_static::lazy_static;
use num_bigint::BigInt;
use thiserror::Error;

/// Public exponent shared by every key this crate produces.
pub const PUBLIC_EXPONENT: u32 = 17;

/// Width of one base64 line inside an armored block.
pub const BASE64_SPLIT: usize = 76;

/// An RSA key. The private exponent only exists on the private variant,
/// so a public key can never carry one. The variants are not reachable from
/// outside, keys only come from the checked constructors:
///
/// ```compile_fail
/// use num_bigint::BigInt;
/// use rsa_keys::Key;
///
/// let key = Key::Private {
///     modulus: BigInt::from(3233),
///     public_exponent: BigInt::from(99),
///     private_exponent: BigInt::from(0),
/// };
/// ```
///
/// ```compile_fail
/// use num_bigint::BigInt;
/// use rsa_keys::Key;
///
/// let mut key = Key::new_private(BigInt::from(3233), BigInt::from(413)).unwrap();
/// key.0 = Key::new_public(BigInt::from(3233)).0;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(KeyInner);

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyInner {
    Public {
        modulus: BigInt,
    },
    Private {
        modulus: BigInt,
        private_exponent: BigInt,
    },
}

lazy_static! {
    static ref PUBLIC_EXPONENT_BIG: BigInt = BigInt::from(PUBLIC_EXPONENT);
}

impl Key {
    pub fn new(modulus: BigInt, kind: KeyKind, private_exponent: Option<BigInt>) -> Result<Self, KeyError> {
        match (kind, private_exponent) {
            (KeyKind::Public, None) => Ok(Self::new_public(modulus)),
            (KeyKind::Public, Some(_)) => Err(KeyError::InvalidKeyMaterial(
                "public key must not carry a private exponent".to_string())),
            (KeyKind::Private, Some(d)) => Self::new_private(modulus, d),
            (KeyKind::Private, None) => Err(KeyError::InvalidKeyMaterial(
                "private key requires a private exponent".to_string())),
        }
    }

    pub fn new_public(modulus: BigInt) -> Self {
        Key(KeyInner::Public { modulus })
    }

    pub fn new_private(modulus: BigInt, private_exponent: BigInt) -> Result<Self, KeyError> {
        if private_exponent < BigInt::from(2) {
            return Err(KeyError::InvalidKeyMaterial(
                format!("private exponent must be at least 2, got {}", private_exponent)));
        }
        Ok(Key(KeyInner::Private { modulus, private_exponent }))
    }

    pub fn kind(&self) -> KeyKind {
        match &self.0 {
            KeyInner::Public { .. } => KeyKind::Public,
            KeyInner::Private { .. } => KeyKind::Private,
        }
    }

    pub fn is_private(&self) -> bool { self.kind() == KeyKind::Private }

    pub fn modulus(&self) -> &BigInt {
        match &self.0 {
            KeyInner::Public { modulus } | KeyInner::Private { modulus, .. } => modulus,
        }
    }

    /// Always `PUBLIC_EXPONENT`.
    pub fn public_exponent(&self) -> &BigInt {
        &PUBLIC_EXPONENT_BIG
    }

    pub fn private_exponent(&self) -> Option<&BigInt> {
        match &self.0 {
            KeyInner::Public { .. } => None,
            KeyInner::Private { private_exponent, .. } => Some(private_exponent),
        }
    }

    /// Public half of this key; a public key is returned as is.
    pub fn to_public(&self) -> Key {
        Self::new_public(self.modulus().clone())
    }
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
    #[error("no key material between the armor lines")]
    EmptyKeyMaterial,
    #[error("malformed key block: {0}")]
    MalformedKeyBlock(String),
    #[error("missing key field `{0}`")]
    MissingKeyField(&'static str),
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(Box<KeyError>),
    #[error("invalid public key: {0}")]
    InvalidPublicKey(Box<KeyError>),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

use std::error::Error;
use std::fmt::{Display, Formatter};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use crate::rsa::keys::{Key, KeyError, KeyKind};

/// JSON shape of a key pair: both keys as armored text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPairRecord {
    #[serde(rename = "PrivateKey", default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(rename = "PublicKey", default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "KeyPairRecord", try_from = "KeyPairRecord")]
pub struct KeyPair {
    private_key: Key,
    public_key: Key,
}

impl KeyPair {
    pub fn new(private_key: Key, public_key: Key) -> Result<Self, KeyError> {
        if private_key.kind() != KeyKind::Private {
            return Err(KeyError::InvalidPrivateKey(Box::new(KeyError::InvalidKeyMaterial(
                format!("expected a PRIVATE key, got {}", private_key.kind())))));
        }
        if public_key.kind() != KeyKind::Public {
            return Err(KeyError::InvalidPublicKey(Box::new(KeyError::InvalidKeyMaterial(
                format!("expected a PUBLIC key, got {}", public_key.kind())))));
        }
        Ok(Self { private_key, public_key })
    }

    pub fn generate(modulus: BigInt, private_exponent: BigInt) -> Result<Self, KeyError> {
        let public_key = Key::new_public(modulus.clone());
        let private_key = Key::new_private(modulus, private_exponent)?;
        Ok(Self { private_key, public_key })
    }

    pub fn private_key(&self) -> &Key {
        &self.private_key
    }

    pub fn public_key(&self) -> &Key {
        &self.public_key
    }

    pub fn into_keys(self) -> (Key, Key) {
        (self.private_key, self.public_key)
    }

    pub fn to_structured_record(&self) -> KeyPairRecord {
        KeyPairRecord {
            private_key: Some(self.private_key.to_armored_text()),
            public_key: Some(self.public_key.to_armored_text()),
        }
    }

    pub fn from_structured_record(record: &KeyPairRecord) -> Result<Self, KeyError> {
        let private_text = record.private_key.as_deref().ok_or(KeyError::MissingKeyField("PrivateKey"))?;
        let public_text = record.public_key.as_deref().ok_or(KeyError::MissingKeyField("PublicKey"))?;
        let private_key = Key::try_parse_armored_text(private_text)
            .map_err(|e| KeyError::InvalidPrivateKey(Box::new(e)))?;
        let public_key = Key::try_parse_armored_text(public_text)
            .map_err(|e| KeyError::InvalidPublicKey(Box::new(e)))?;
        Self::new(private_key, public_key)
    }

    pub fn to_json(&self) -> Result<String, KeyError> {
        Ok(serde_json::to_string(&self.to_structured_record())?)
    }

    pub fn to_json_pretty(&self) -> Result<String, KeyError> {
        Ok(serde_json::to_string_pretty(&self.to_structured_record())?)
    }

    pub fn from_json(json: &str) -> Result<Self, KeyError> {
        let record: KeyPairRecord = serde_json::from_str(json)?;
        Self::from_structured_record(&record)
    }

    /// Key files are `<path>` (private) and `<path>.pub` (public).
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let private_key = Key::load(path)
            .map_err(|e| format!("{}: {}", path, e))?;
        let path_public = path.to_string() + ".pub";
        let public_key = Key::load(&path_public)
            .map_err(|e| format!("{}: {}", path_public, e))?;
        Ok(Self::new(private_key, public_key)?)
    }

    pub fn save(&self, path: &str) -> Result<(), Box<dyn Error>> {
        let path_public = path.to_string() + ".pub";
        self.public_key.save(&path_public)?;
        self.private_key.save(path)?;
        Ok(())
    }
}

impl From<KeyPair> for KeyPairRecord {
    fn from(pair: KeyPair) -> Self {
        pair.to_structured_record()
    }
}

impl TryFrom<KeyPairRecord> for KeyPair {
    type Error = KeyError;

    fn try_from(record: KeyPairRecord) -> Result<Self, Self::Error> {
        KeyPair::from_structured_record(&record)
    }
}

impl Display for KeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let json = self.to_json().map_err(|_| std::fmt::Error)?;
        write!(f, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::error::Error;
    use num_bigint::{BigInt, RandBigInt};
    use crate::rsa::keys::{Key, KeyError, KeyPair, KeyPairRecord};

    fn scenario_pair() -> Result<KeyPair, KeyError> {
        KeyPair::generate(BigInt::from(3233), BigInt::from(413))
    }

    #[test]
    fn test_generate() -> Result<(), Box<dyn Error>> {
        let pair = scenario_pair()?;
        assert_eq!(pair.public_key(), &Key::new_public(BigInt::from(3233)));
        assert_eq!(pair.private_key(), &Key::new_private(BigInt::from(3233), BigInt::from(413))?);
        assert!(matches!(KeyPair::generate(BigInt::from(3233), BigInt::from(1)),
            Err(KeyError::InvalidKeyMaterial(_))));
        Ok(())
    }

    #[test]
    fn test_new_checks_kinds() -> Result<(), Box<dyn Error>> {
        let (private, public) = scenario_pair()?.into_keys();
        assert!(matches!(KeyPair::new(public.clone(), public.clone()), Err(KeyError::InvalidPrivateKey(_))));
        assert!(matches!(KeyPair::new(private.clone(), private.clone()), Err(KeyError::InvalidPublicKey(_))));
        assert_eq!(KeyPair::new(private, public)?, scenario_pair()?);
        Ok(())
    }

    #[test]
    fn test_structured_record() -> Result<(), Box<dyn Error>> {
        let pair = scenario_pair()?;
        let record = pair.to_structured_record();
        assert_eq!(record.private_key.as_deref(), Some(pair.private_key().to_armored_text().as_str()));
        assert_eq!(record.public_key.as_deref(), Some(pair.public_key().to_armored_text().as_str()));
        assert_eq!(KeyPair::from_structured_record(&record)?, pair);
        Ok(())
    }

    #[test]
    fn test_structured_round_trip_random() -> Result<(), Box<dyn Error>> {
        let mut rng = rand::thread_rng();
        for _ in 0..16 {
            let n = BigInt::from(rng.gen_biguint(2048));
            let d = BigInt::from(rng.gen_biguint(2048)) + 2;
            let pair = KeyPair::generate(n, d)?;
            assert_eq!(KeyPair::from_structured_record(&pair.to_structured_record())?, pair);
            assert_eq!(KeyPair::from_json(&pair.to_json()?)?, pair);
        }
        Ok(())
    }

    #[test]
    fn test_missing_field() -> Result<(), Box<dyn Error>> {
        let mut record = scenario_pair()?.to_structured_record();
        record.public_key = None;
        assert!(matches!(KeyPair::from_structured_record(&record), Err(KeyError::MissingKeyField("PublicKey"))));
        assert!(matches!(KeyPair::from_structured_record(&KeyPairRecord::default()),
            Err(KeyError::MissingKeyField("PrivateKey"))));
        let json = serde_json::to_string(&record)?;
        assert!(!json.contains("PublicKey"));
        assert!(matches!(KeyPair::from_json(&json), Err(KeyError::MissingKeyField("PublicKey"))));
        Ok(())
    }

    #[test]
    fn test_kind_mismatch() -> Result<(), Box<dyn Error>> {
        let pair = scenario_pair()?;
        let swapped = KeyPairRecord {
            private_key: Some(pair.public_key().to_armored_text()),
            public_key: Some(pair.private_key().to_armored_text()),
        };
        assert!(matches!(KeyPair::from_structured_record(&swapped), Err(KeyError::InvalidPrivateKey(_))));
        let both_private = KeyPairRecord {
            private_key: Some(pair.private_key().to_armored_text()),
            public_key: Some(pair.private_key().to_armored_text()),
        };
        assert!(matches!(KeyPair::from_structured_record(&both_private), Err(KeyError::InvalidPublicKey(_))));
        Ok(())
    }

    #[test]
    fn test_unparsable_fields() -> Result<(), Box<dyn Error>> {
        let pair = scenario_pair()?;
        let record = KeyPairRecord {
            private_key: Some("".to_string()),
            public_key: Some(pair.public_key().to_armored_text()),
        };
        match KeyPair::from_structured_record(&record) {
            Err(KeyError::InvalidPrivateKey(e)) => assert!(matches!(*e, KeyError::EmptyKeyMaterial)),
            r => panic!("unexpected result: {:?}", r),
        }
        let record = KeyPairRecord {
            private_key: Some(pair.private_key().to_armored_text()),
            public_key: Some("@@@".to_string()),
        };
        match KeyPair::from_structured_record(&record) {
            Err(KeyError::InvalidPublicKey(e)) => assert!(matches!(*e, KeyError::MalformedKeyBlock(_))),
            r => panic!("unexpected result: {:?}", r),
        }
        assert!(matches!(KeyPair::from_json("{not json"), Err(KeyError::Json(_))));
        Ok(())
    }

    #[test]
    fn test_json_shape() -> Result<(), Box<dyn Error>> {
        let pair = scenario_pair()?;
        let value: serde_json::Value = serde_json::from_str(&pair.to_string())?;
        let object = value.as_object().ok_or("not an object")?;
        assert_eq!(object.len(), 2);
        assert_eq!(object["PrivateKey"], pair.private_key().to_armored_text());
        assert_eq!(object["PublicKey"], pair.public_key().to_armored_text());
        // private exponent never shows up as a bare field
        assert!(!object.keys().any(|k| k.to_lowercase().contains("exponent")));
        let via_serde: KeyPair = serde_json::from_value(value)?;
        assert_eq!(via_serde, pair);
        assert_eq!(serde_json::to_string(&pair)?, pair.to_json()?);
        Ok(())
    }

    #[test]
    fn test_save_load() -> Result<(), Box<dyn Error>> {
        let pair = scenario_pair()?;
        let path = env::temp_dir().join(format!("rsa-keys-test-{}", std::process::id()));
        let path = path.to_str().ok_or("temp path")?.to_string();
        pair.save(&path)?;
        assert_eq!(KeyPair::load(&path)?, pair);
        assert_eq!(Key::load(&(path.clone() + ".pub"))?, *pair.public_key());
        std::fs::remove_file(&path)?;
        std::fs::remove_file(path + ".pub")?;
        Ok(())
    }
}

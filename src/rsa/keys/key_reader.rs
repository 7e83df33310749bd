use std::error::Error;
use std::fs;
use std::str::FromStr;
use num_bigint::BigInt;
use tracing::debug;
use crate::rsa::keys::{BASE64_SPLIT, Key, KeyError, KeyKind};

/// Splits an armored block back into its base64 payload groups.
pub struct KeyReader {
    groups: Vec<String>,
}

impl KeyReader {
    pub fn new(text: &str) -> Result<Self, KeyError> {
        let body = text.lines()
            .filter(|line| !KeyKind::is_armor_line(line))
            .collect::<Vec<_>>()
            .join("\n");
        let body = body.trim();
        if body.is_empty() {
            return Err(KeyError::EmptyKeyMaterial);
        }
        let mut s = Self { groups: vec![] };
        s.parse_text(body);
        Ok(s)
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Only the last line of a wrapped payload is shorter than `BASE64_SPLIT`,
    /// so a short line closes the current group.
    fn parse_text(&mut self, body: &str) {
        let mut buffer = String::new();
        for line in body.lines() {
            let line = line.trim();
            buffer.push_str(line);
            if line.len() < BASE64_SPLIT {
                self.flush_group(&mut buffer);
            }
        }
        self.flush_group(&mut buffer);
    }

    fn flush_group(&mut self, buffer: &mut String) {
        let group = buffer.trim();
        if !group.is_empty() {
            self.groups.push(group.to_string());
        }
        buffer.clear();
    }

    fn decode_group(group: &str) -> Result<BigInt, KeyError> {
        let bytes = base64::decode_config(group, base64::STANDARD)
            .map_err(|e| KeyError::MalformedKeyBlock(format!("invalid base64: {}", e)))?;
        Ok(BigInt::from_signed_bytes_be(&bytes))
    }

    pub fn read_key(&self) -> Result<Key, KeyError> {
        match self.groups.as_slice() {
            [modulus] => Ok(Key::new_public(Self::decode_group(modulus)?)),
            [modulus, private_exponent] => Key::new_private(
                Self::decode_group(modulus)?,
                Self::decode_group(private_exponent)?),
            groups => Err(KeyError::MalformedKeyBlock(
                format!("expected 1 or 2 payload groups, found {}", groups.len()))),
        }
    }
}

impl Key {
    pub fn try_parse_armored_text(text: &str) -> Result<Key, KeyError> {
        let res = KeyReader::new(text).and_then(|reader| reader.read_key());
        if let Err(e) = &res {
            debug!(error = %e, "failed to parse armored key");
        }
        res
    }

    pub fn load(path: &str) -> Result<Key, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Ok(Key::try_parse_armored_text(&text)?)
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::try_parse_armored_text(s)
    }
}

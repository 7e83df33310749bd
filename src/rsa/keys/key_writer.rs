use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io;
use std::io::Write;
use serde::{Serialize, Serializer};
use crate::rsa::keys::{BASE64_SPLIT, Key, KeyKind};

/// Collects base64 payload groups between a header and a footer line.
pub struct KeyWriter {
    buffer: String,
    header: String,
    footer: String,
}

impl From<KeyKind> for KeyWriter {
    fn from(kind: KeyKind) -> Self {
        KeyWriter {
            buffer: String::new(),
            header: kind.header(),
            footer: kind.footer(),
        }
    }
}

impl KeyWriter {
    /// Appends one payload group, wrapped at `BASE64_SPLIT` characters.
    pub fn write_payload(&mut self, data: &[u8]) {
        let encoded = base64::encode_config(data, base64::STANDARD);
        for start in (0..encoded.len()).step_by(BASE64_SPLIT) {
            let end = usize::min(start + BASE64_SPLIT, encoded.len());
            self.buffer.push_str(&encoded[start..end]);
            self.buffer.push('\n');
        }
        // a full last line would not end the group on read
        if !encoded.is_empty() && encoded.len() % BASE64_SPLIT == 0 {
            self.buffer.push('\n');
        }
    }

    pub fn finish(self) -> String {
        format!("{}\n{}{}", self.header, self.buffer, self.footer)
    }
}

impl Key {
    pub fn to_armored_text(&self) -> String {
        let mut writer = KeyWriter::from(self.kind());
        writer.write_payload(&self.modulus().to_signed_bytes_be());
        if let Some(d) = self.private_exponent() {
            writer.write_payload(&d.to_signed_bytes_be());
        }
        writer.finish()
    }

    pub fn save(&self, path: &str) -> io::Result<()> {
        let mut f = File::create(path)?;
        f.write_all(self.to_armored_text().as_bytes())?;
        f.write_all(b"\n")?;
        f.flush()
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_armored_text())
    }
}

/// Keys embed as their armored text. There is intentionally no `Deserialize`:
/// keys are read back through `KeyPair::from_structured_record`.
impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_armored_text())
    }
}

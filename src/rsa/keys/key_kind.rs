use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Public,
    Private,
}

impl KeyKind {
    pub const ALL: [KeyKind; 2] = [KeyKind::Private, KeyKind::Public];

    pub fn mode(&self) -> &'static str {
        match self {
            KeyKind::Public => "PUBLIC",
            KeyKind::Private => "PRIVATE",
        }
    }

    pub fn header(&self) -> String {
        format!("-----BEGIN RSA {} KEY-----", self.mode())
    }

    pub fn footer(&self) -> String {
        format!("-----END RSA {} KEY-----", self.mode())
    }

    /// Whether `line` is one of the four `BEGIN`/`END` delimiter lines.
    pub fn is_armor_line(line: &str) -> bool {
        let line = line.trim();
        let label = line.strip_prefix("-----BEGIN RSA ")
            .or_else(|| line.strip_prefix("-----END RSA "))
            .and_then(|rest| rest.strip_suffix(" KEY-----"));
        match label {
            Some(mode) => KeyKind::ALL.iter().any(|k| k.mode() == mode),
            None => false,
        }
    }
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mode())
    }
}

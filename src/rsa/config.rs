use std::io;
use lazy_static::lazy_static;
use mut_static::MutStatic;
use tracing_subscriber::EnvFilter;
use crate::RsaKeys;

pub const DEFAULT_LOG_FILTER: &str = "rsa_keys=info";

lazy_static! {
    pub static ref CONFIG_DEF: RsaKeys = RsaKeys {
        mode: String::from("inspect"),
        key: String::from("key"),
        input: String::from("stdin"),
        output: String::from("stdout"),
        modulus: String::new(),
        exponent: String::new(),
        silent: false,
    };
    pub static ref SILENT: MutStatic<bool> =
        MutStatic::new();
}

pub fn is_silent() -> bool {
    SILENT.read().map(|s| *s).unwrap_or(false)
}

/// Logs go to stderr so stdout stays clean for key output.
pub fn init_logging(silent: bool) {
    let filter = if silent {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

pub mod rsa;

pub use crate::rsa::*;
pub use crate::rsa::keys::*;
pub use crate::rsa::config::SILENT;

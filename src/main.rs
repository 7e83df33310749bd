use std::error::Error;
use clap::Parser;
use rsa_keys::RsaKeys;
use rsa_keys::config::{init_logging, SILENT};

fn main() -> Result<(), Box<dyn Error>> {
    let mut cli = RsaKeys::parse();
    if cli.writes_stdout() {
        cli.silent = true;
    }
    if !SILENT.is_set()? { SILENT.set(cli.silent)?; }
    init_logging(cli.silent);
    cli.run()
}

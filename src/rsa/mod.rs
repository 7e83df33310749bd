use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use clap::Parser;
use num_bigint::BigInt;
use tracing::info;

pub mod config;
pub mod keys;

use config::*;
use keys::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Generate,
    Split,
    Join,
    Inspect,
}

#[macro_export]
macro_rules! rsa_keys_t {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Clone, Parser)]
#[clap(name = "rsa-keys", about = "Build, split, join and inspect RSA key files")]
pub struct $NAME {
    #[clap(short, long, value_parser, default_value = $CONFIG.mode.as_str(), help = "Run mode: generate, split, join, inspect")]
    pub mode: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.key.as_str(), help = "Key path, split/join use `path' and `path.pub'")]
    pub key: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.input.as_str(), help = "Input filename")]
    pub input: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.output.as_str(), help = "Output filename")]
    pub output: String,
    #[clap(short = 'n', long, value_parser, default_value = $CONFIG.modulus.as_str(), help = "Decimal modulus for generate")]
    pub modulus: String,
    #[clap(short = 'd', long, value_parser, default_value = $CONFIG.exponent.as_str(), help = "Decimal private exponent for generate")]
    pub exponent: String,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.silent, help = "Disable log output")]
    pub silent: bool,
}
    };
}

rsa_keys_t!(CONFIG_DEF, RsaKeys);

fn status(msg: &str) {
    if !is_silent() { println!("{}", msg); }
}

pub fn describe(key: &Key) -> String {
    format!("{} key, {} bits, e = {}", key.kind(), key.modulus().bits(), key.public_exponent())
}

impl RsaKeys {
    pub fn run_mode(&self) -> Result<RunMode, Box<dyn Error>> {
        match self.mode.as_str() {
            "generate" => Ok(RunMode::Generate),
            "split" => Ok(RunMode::Split),
            "join" => Ok(RunMode::Join),
            "inspect" => Ok(RunMode::Inspect),
            _ => Err("Unknown run mode! available: generate, split, join, inspect(default)".into()),
        }
    }

    /// Output goes to stdout for the modes that print keys there.
    pub fn writes_stdout(&self) -> bool {
        self.output == "stdout" && matches!(self.run_mode(), Ok(RunMode::Generate) | Ok(RunMode::Join))
    }

    pub fn read_input(&self) -> Result<String, Box<dyn Error>> {
        let mut text = String::new();
        match self.input.as_str() {
            "stdin" => { io::stdin().read_to_string(&mut text)?; }
            f => { text = fs::read_to_string(f)?; }
        }
        Ok(text)
    }

    pub fn writer(&self) -> Result<Box<dyn Write>, Box<dyn Error>> {
        Ok(match self.output.as_str() {
            "stdout" => Box::new(io::stdout()),
            f => Box::new(File::create(f)?),
        })
    }

    fn parse_number(name: &str, value: &str) -> Result<BigInt, Box<dyn Error>> {
        if value.is_empty() {
            return Err(format!("--{} is required for generate", name).into());
        }
        value.trim().parse::<BigInt>()
            .map_err(|e| format!("invalid --{} `{}': {}", name, value, e).into())
    }

    fn write_pair(&self, pair: &KeyPair) -> Result<(), Box<dyn Error>> {
        let mut writer = self.writer()?;
        writer.write_all(pair.to_json_pretty()?.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Lines describing whatever key material `text` holds, JSON record or armor.
    pub fn inspect(text: &str) -> Result<Vec<String>, KeyError> {
        if text.trim_start().starts_with('{') {
            let pair = KeyPair::from_json(text)?;
            Ok(vec![describe(pair.private_key()), describe(pair.public_key())])
        } else {
            Ok(vec![describe(&Key::try_parse_armored_text(text)?)])
        }
    }

    pub fn run(&self) -> Result<(), Box<dyn Error>> {
        match self.run_mode()? {
            RunMode::Generate => {
                let modulus = Self::parse_number("modulus", &self.modulus)?;
                let exponent = Self::parse_number("exponent", &self.exponent)?;
                let pair = KeyPair::generate(modulus, exponent)?;
                info!(bits = pair.public_key().modulus().bits(), "generated key pair");
                self.write_pair(&pair)?;
                status(&format!("Generated key pair: {}", self.output));
            }
            RunMode::Split => {
                let pair = KeyPair::from_json(&self.read_input()?)?;
                pair.save(&self.key)?;
                info!(key = %self.key, "split key pair into armored files");
                status(&format!("Generated key files: {}, {}", self.key, self.key.clone() + ".pub"));
            }
            RunMode::Join => {
                let pair = KeyPair::load(&self.key)?;
                info!(key = %self.key, "joined armored files into a record");
                self.write_pair(&pair)?;
            }
            RunMode::Inspect => {
                for line in Self::inspect(&self.read_input()?)? {
                    println!("{}", line);
                }
            }
        }
        Ok(())
    }
}

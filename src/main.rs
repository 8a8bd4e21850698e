use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bysquare::{decode, encode, DataModel, EncodeOptions, Version};

#[derive(Parser)]
#[command(name = "bysquare", version, about = "Slovak PAY by square QR payment codec")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode JSON payment data into a BySquare QR string
    Encode {
        /// Path to a JSON document, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Keep diacritics instead of folding them to basic Latin
        #[arg(long)]
        no_deburr: bool,

        /// Skip validation of the payment data
        #[arg(long)]
        no_validate: bool,

        /// Format version to emit: 0 (v1.0.0), 1 (v1.1.0) or 2 (v1.2.0)
        #[arg(long, default_value_t = 2)]
        format_version: u8,
    },
    /// Decode a BySquare QR string into JSON payment data
    Decode {
        /// QR string, path to a file containing one, or "-" for stdin
        qr: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let output = match Cli::parse().command {
        Command::Encode {
            input,
            no_deburr,
            no_validate,
            format_version,
        } => {
            let version = Version::try_from(format_version)
                .map_err(|v| anyhow!("unsupported format version: {v}"))?;
            let options = EncodeOptions {
                deburr: !no_deburr,
                validate: !no_validate,
                version,
            };
            cmd_encode(&input, options)?
        }
        Command::Decode { qr } => cmd_decode(&qr)?,
    };

    println!("{output}");
    Ok(())
}

fn cmd_encode(input: &str, options: EncodeOptions) -> Result<String> {
    let raw = read_input(input)?;
    let model: DataModel =
        serde_json::from_str(&raw).context("failed to parse JSON payment data")?;

    Ok(encode(&model, options)?)
}

fn cmd_decode(qr: &str) -> Result<String> {
    // The argument is a literal QR string unless it names an existing file.
    let raw = if qr == "-" || Path::new(qr).is_file() {
        read_input(qr)?
    } else {
        qr.to_string()
    };

    let model = decode(raw.trim())?;

    serde_json::to_string_pretty(&model).context("failed to render JSON output")
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {source}"))
    }
}

//! ipdb: CLI tool for inspecting and querying IP geolocation database files.

use clap::{Parser, Subcommand};
use ipdb::{
    Category, Database, FormatSelection, FormatVariant, Header, Layout, LoadOptions, LookupError,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ipdb")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Inspect and query IP geolocation database files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print header and layout information
    Info {
        /// Database file (.gz files are decompressed)
        database: PathBuf,

        /// On-disk layout: auto, legacy or current
        #[arg(short, long, default_value = "auto")]
        format: FormatSelection,

        /// Print header and layout as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Look up one or more IPv4 addresses
    Lookup {
        /// Database file (.gz files are decompressed)
        database: PathBuf,

        /// Addresses to look up
        #[arg(required = true)]
        addresses: Vec<String>,

        /// On-disk layout: auto, legacy or current
        #[arg(short, long, default_value = "auto")]
        format: FormatSelection,

        /// Print one JSON object per address
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct InfoJson<'a> {
    format: FormatVariant,
    header: &'a Header,
    layout: &'a Layout,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    ip: &'a str,
    #[serde(flatten)]
    result: Option<ipdb::LookupResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Info {
            database,
            format,
            json,
        } => info(&database, format, json),
        Commands::Lookup {
            database,
            addresses,
            format,
            json,
        } => lookup(&database, &addresses, format, json),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn info(
    path: &PathBuf,
    format: FormatSelection,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_readfile_with(path, LoadOptions::new(format))?;
    let header = db.header();
    let layout = db.layout();

    if json {
        let info = InfoJson {
            format: db.variant(),
            header,
            layout,
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File:      {:?}", path);
    println!("Format:    {}", db.variant());
    println!("Version:   {}", header.version);
    for category in Category::ALL {
        let range = layout.dictionary(category);
        println!(
            "{:<10} {:>8} entries  [{}, {})",
            format!("{}:", category),
            header.count(category),
            range.start,
            range.end
        );
    }
    println!("Records:   {}", header.record_count);
    println!("Rstart:    {}", layout.records_start);
    match layout.index_offset {
        Some(offset) => println!("Index:     256 entries at {}", offset),
        None => println!("Index:     none"),
    }
    Ok(())
}

fn lookup(
    path: &PathBuf,
    addresses: &[String],
    format: FormatSelection,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_readfile_with(path, LoadOptions::new(format))?;

    for address in addresses {
        let outcome = db.lookup(address);
        if json {
            let line = match outcome {
                Ok(result) => JsonLine {
                    ip: address,
                    result: Some(result),
                    error: None,
                },
                Err(e) => JsonLine {
                    ip: address,
                    result: None,
                    error: Some(e.to_string()),
                },
            };
            println!("{}", serde_json::to_string(&line)?);
        } else {
            match outcome {
                Ok(result) => println!("{}\t{}", address, result),
                Err(LookupError::AddressNotFound(_)) => println!("{}\tnot found", address),
                Err(e) => println!("{}\terror: {}", address, e),
            }
        }
    }
    Ok(())
}

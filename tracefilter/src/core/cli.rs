use clap::{Parser, Subcommand};

use std::path::PathBuf;

use crate::filters::{Entity, ValueEncoding};

use super::constants::{
    ENV_CONFIG, ENV_ENCODING, ENV_LOG_JSON, ENV_MAX_FILTERS, ENV_MAX_JSON_BYTES, ENV_TIMEZONE,
};

#[derive(Parser)]
#[command(name = "tracefilter")]
#[command(version, about = "Validate and decode entity filter lists", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Value encoding (plain, url or base64)
    #[arg(long, short = 'e', global = true, env = ENV_ENCODING, value_parser = parse_encoding)]
    pub encoding: Option<ValueEncoding>,

    /// IANA timezone for timestamps without an offset (e.g. Europe/Berlin)
    #[arg(long, global = true, env = ENV_TIMEZONE)]
    pub timezone: Option<String>,

    /// Maximum number of filters per list
    #[arg(long, global = true, env = ENV_MAX_FILTERS)]
    pub max_filters: Option<usize>,

    /// Maximum size of the filter JSON in bytes
    #[arg(long, global = true, env = ENV_MAX_JSON_BYTES)]
    pub max_json_bytes: Option<usize>,

    /// Emit logs as JSON
    #[arg(long, global = true, env = ENV_LOG_JSON)]
    pub log_json: bool,
}

/// Parse value encoding from CLI/env string
fn parse_encoding(s: &str) -> Result<ValueEncoding, String> {
    match s.to_lowercase().as_str() {
        "plain" | "none" => Ok(ValueEncoding::Plain),
        "url" => Ok(ValueEncoding::Url),
        "base64" => Ok(ValueEncoding::Base64),
        _ => Err(format!(
            "Invalid encoding '{}'. Valid options: plain, url, base64",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Parse a JSON filter list and print the decoded filters
    Parse {
        /// Entity the filters apply to; omit when each descriptor carries an "entity" tag
        #[arg(long, short = 'E')]
        entity: Option<Entity>,

        /// File containing the filter JSON (reads stdin when omitted)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,
    },
    /// List the filterable fields of an entity
    Fields {
        #[arg(long, short = 'E')]
        entity: Entity,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub encoding: Option<ValueEncoding>,
    pub timezone: Option<String>,
    pub max_filters: Option<usize>,
    pub max_json_bytes: Option<usize>,
    pub log_json: bool,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        encoding: cli.encoding,
        timezone: cli.timezone,
        max_filters: cli.max_filters,
        max_json_bytes: cli.max_json_bytes,
        log_json: cli.log_json,
    };
    (config, cli.command)
}

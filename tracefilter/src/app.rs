//! Core application

use std::path::Path;

use anyhow::{Context, Result};

use crate::api::ApiError;
use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::filters::{Entity, Filter, FilterError, FilterParser, WireDecoder, schema};
use crate::utils::file::read_input;

pub struct CoreApp {
    pub config: AppConfig,
    decoder: WireDecoder,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let (cli_config, command) = cli::parse();
        Self::init_logging(cli_config.log_json);

        tracing::debug!("Application starting");
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(AppConfig::load(&cli_config)?)?;

        match command {
            Commands::Parse { entity, input } => app.handle_parse(entity, input.as_deref()),
            Commands::Fields { entity } => Self::handle_fields(entity),
        }
    }

    /// Build the app from resolved config; checks the field tables once
    pub fn init(config: AppConfig) -> Result<Self> {
        schema::validate().context("Built-in filter schema is invalid")?;
        let decoder = WireDecoder::new(config.filters.encoding);
        Ok(Self { config, decoder })
    }

    fn parser(&self) -> FilterParser<'_> {
        FilterParser::new(&self.decoder, self.config.filters.decode_context())
            .with_limits(self.config.filters.limits)
    }

    /// Parse a filter list for `entity`, or a tagged list when no entity is given
    pub fn parse(&self, json: &str, entity: Option<Entity>) -> Result<Vec<Filter>, FilterError> {
        match entity {
            Some(entity) => self.parser().parse(json, entity),
            None => self.parser().parse_tagged(json),
        }
    }

    /// Pretty JSON for the parsed filters, or the error body to report
    pub fn render(&self, json: &str, entity: Option<Entity>) -> Result<String, ApiError> {
        let filters = self.parse(json, entity)?;
        serde_json::to_string_pretty(&filters)
            .map_err(|e| ApiError::internal(format!("Failed to serialize filters: {}", e)))
    }

    fn handle_parse(&self, entity: Option<Entity>, input: Option<&Path>) -> Result<()> {
        let json = read_input(input)?;

        match self.render(&json, entity) {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => {
                if let ApiError::Internal { message } = &e {
                    tracing::error!(message = %message, "Internal error");
                }
                println!("{}", serde_json::to_string_pretty(&e.body())?);
                anyhow::bail!("Filter list rejected ({})", e.status())
            }
        }
    }

    fn handle_fields(entity: Entity) -> Result<()> {
        let fields = schema::fields(entity);
        println!("{}", serde_json::to_string_pretty(&fields)?);
        Ok(())
    }

    fn init_logging(json: bool) {
        let default_filter = format!("warn,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_env_filter(filter);

        if json {
            builder.json().init();
        } else {
            builder.compact().init();
        }
    }
}

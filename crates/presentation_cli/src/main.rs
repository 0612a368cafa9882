//! Geocoder CLI
//!
//! Forward and reverse lookups against the Google Geocoding API from the
//! command line, plus offline distance and URL-signing helpers.

#![allow(clippy::print_stdout)]

mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use domain::Coordinate;
use infrastructure::{AppConfig, init_logging, load_field_mapping};
use integration_geocoding::{
    GeocodingClient, GeocodingConfig, GoogleGeocodingClient, ResponseFormat, UrlSigner, sign_url,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Geocoder CLI
#[derive(Debug, Parser)]
#[command(name = "geocoder-cli")]
#[command(author, version, about = "Google Geocoding API v3 command-line client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Premium-plan client ID
    #[arg(short = 'c', long, global = true)]
    client_id: Option<String>,

    /// URL-safe base64 signing key
    #[arg(short = 'k', long, env = "GEOCODER_SIGNING_KEY", hide_env_values = true, global = true)]
    key: Option<String>,

    /// Response format (xml or json)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Geocoding endpoint base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve an address to a position and structured address
    ///
    /// Example: geocoder-cli forward 1488 Montgomery Highway Birmingham AL 35216
    Forward {
        /// Address words, joined with spaces
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },

    /// Resolve a "lat,lon" coordinate to a structured address
    ///
    /// Example: geocoder-cli reverse 40.714224,-72.961452
    Reverse {
        /// Coordinate as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        coordinate: Coordinate,
    },

    /// Great-circle distance and initial bearing between two coordinates
    Distance {
        /// Start coordinate as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        from: Coordinate,

        /// End coordinate as "lat,lon"
        #[arg(allow_hyphen_values = true)]
        to: Coordinate,
    },

    /// Sign a complete request URL with the configured key
    Sign {
        /// URL to sign, including its query string
        url: String,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut GeocodingConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(format) = &self.format {
            config.response_format = ResponseFormat::from_name(format);
        }
        if let Some(client_id) = &self.client_id {
            config.client_id = Some(client_id.clone());
        }
        if let Some(key) = &self.key {
            config.signing_key = Some(SecretString::from(key.clone()));
        }
    }
}

fn build_client(config: &AppConfig) -> anyhow::Result<GoogleGeocodingClient> {
    let mapping = load_field_mapping(&config.mapping)?;
    let client = GoogleGeocodingClient::new(&config.geocoding)?.with_mapping(mapping);
    debug!(?client, "Geocoding client ready");
    Ok(client)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_logging(&config.logging, cli.verbose)?;

    cli.apply_overrides(&mut config.geocoding);
    config.validate().map_err(anyhow::Error::msg)?;

    match &cli.command {
        Commands::Forward { address } => {
            let client = build_client(&config)?;
            let record = client.forward_geocode(&address.join(" ")).await?;

            println!();
            println!("{}", render::forward_block(record.as_ref()));
        },

        Commands::Reverse { coordinate } => {
            let client = build_client(&config)?;
            let record = client.reverse_geocode(*coordinate).await?;

            println!();
            println!("{}", render::address_block(record.as_ref()));
        },

        Commands::Distance { from, to } => {
            println!("{}", render::distance_block(*from, *to));
        },

        Commands::Sign { url } => {
            let key = config
                .geocoding
                .signing_key
                .as_ref()
                .context("A signing key is required (--key or GEOCODER_SIGNING_KEY)")?;
            let signer = UrlSigner::new(key.expose_secret())?;
            let signed = sign_url(&signer, url)?;
            println!("{signed}");
        },
    }

    Ok(())
}

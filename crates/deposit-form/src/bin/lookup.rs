//! deposit-lookup: query the deposit form's suggestion endpoints.
//!
//! Prints the suggestions the form would offer for a query as JSON. Handy
//! for checking endpoint configuration without a browser.
//!
//! Environment variables:
//!   DEPOSIT_*  - endpoint configuration, see `FormConfig`
//!   RUST_LOG   - log filter (default: "deposit_form=info")
//!   LOG_FORMAT - "json" or "text" (default: "text")

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deposit_form::{
    DepositRecord, FieldSignal, FormConfig, FormSession, Keyword, LookupOptions, ReqwestFetcher,
};

#[derive(Parser)]
#[command(name = "deposit-lookup")]
#[command(author, version, about = "Query deposit form suggestion endpoints")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest license identifiers
    Licenses {
        query: String,

        /// Endpoint override
        #[arg(long)]
        url: Option<String>,
    },

    /// Suggest keywords
    Keywords {
        query: String,

        /// Endpoint override
        #[arg(long)]
        url: Option<String>,

        /// Keywords already on the record (can specify multiple)
        #[arg(long = "selected")]
        selected: Vec<String>,
    },

    /// Suggest authors; accepts "Lastname, Firstname: Affiliation"
    Authors {
        query: String,

        /// Endpoint override
        #[arg(long)]
        url: Option<String>,

        /// Extra query parameter as key=value (can specify multiple)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// List deposit categories
    Categories {
        /// Category search endpoint override
        #[arg(long)]
        url: Option<String>,
    },

    /// List deposit types with their category
    Types {
        /// Category search endpoint override
        #[arg(long)]
        url: Option<String>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {:?}", raw)),
    }
}

/// The catalog reads its endpoint from the config when the session is built.
fn override_category_url(config: &mut FormConfig, command: &Commands) {
    if let Commands::Categories { url: Some(url) } | Commands::Types { url: Some(url) } = command
    {
        config.categories_url = url.clone();
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "deposit_form=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing();

    let mut config = FormConfig::from_env().context("invalid form configuration")?;
    override_category_url(&mut config, &cli.command);
    config.validate().context("invalid form configuration")?;

    let (tx, _rx) = tokio::sync::mpsc::unbounded_channel::<FieldSignal>();
    let fetcher = Arc::new(ReqwestFetcher::with_timeout(config.http_timeout));

    let record = match &cli.command {
        Commands::Keywords { selected, .. } => DepositRecord {
            keywords: selected.iter().map(|name| Keyword::new(name.as_str())).collect(),
            ..Default::default()
        },
        _ => DepositRecord::default(),
    };
    let session = FormSession::new(fetcher, record, &config, Arc::new(tx));

    match cli.command {
        Commands::Licenses { query, url } => {
            let options = url.map(LookupOptions::new).unwrap_or_else(|| config.licenses());
            print_json(&session.autocomplete_licenses(&options, &query).await?)
        }
        Commands::Keywords { query, url, .. } => {
            let options = url.map(LookupOptions::new).unwrap_or_else(|| config.keywords());
            print_json(&session.autocomplete_keywords(&options, &query).await?)
        }
        Commands::Authors { query, url, params } => {
            let mut options = url.map(LookupOptions::new).unwrap_or_else(|| config.authors());
            for (key, value) in params {
                options = options.with_param(key, JsonValue::String(value));
            }
            print_json(&session.autocomplete_authors(&options, &query).await?)
        }
        Commands::Categories { .. } => print_json(&session.autocomplete_categories().await?),
        Commands::Types { .. } => print_json(&session.autocomplete_types().await?),
    }
}

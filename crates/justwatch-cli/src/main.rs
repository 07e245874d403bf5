//! justwatch - JustWatch content catalog CLI.

/// Application configuration (TOML).
mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use justwatch_api::{JustWatchApi, JustWatchClient, SearchParams, parse_episode_page};
use serde_json::Value;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, ClientOverrides, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Catalog locale (e.g. "en_US", "de_DE"). Overrides the config file.
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Outbound proxy address. Overrides the config file.
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Proxy type, sent as the `proxy-type` header. Overrides the config file.
    #[arg(long, global = true)]
    proxy_type: Option<String>,

    /// Fixed User-Agent (default: a random browser User-Agent per request).
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search popular titles.
    Search(SearchArgs),
    /// List streaming providers for the locale.
    Providers,
    /// List genres for the locale.
    Genres,
    /// Get a show season.
    Season(IdArgs),
    /// Get the newest episodes of a show.
    Episodes(EpisodesArgs),
    /// Get a title.
    Title(TitleArgs),
    /// Get a person.
    Person(IdArgs),
    /// Inspect or initialize the config file.
    Config(ConfigCommand),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Free-text query (e.g. "The Matrix").
    query: Option<String>,

    /// Raw JSON filter object, validated against the canonical filter keys.
    /// Flags below are applied on top of it.
    #[arg(long)]
    options: Option<String>,

    /// Comma-separated content types (e.g. "movie,show").
    #[arg(long, value_delimiter = ',')]
    content_types: Option<Vec<String>>,

    /// Comma-separated presentation types (e.g. "hd,4k").
    #[arg(long, value_delimiter = ',')]
    presentation_types: Option<Vec<String>>,

    /// Comma-separated provider short names (e.g. "nfx,prv").
    #[arg(long, value_delimiter = ',')]
    providers: Option<Vec<String>>,

    /// Comma-separated genre short names.
    #[arg(long, value_delimiter = ',')]
    genres: Option<Vec<String>>,

    /// Comma-separated audio languages.
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Comma-separated monetization types (e.g. "flatrate,rent").
    #[arg(long, value_delimiter = ',')]
    monetization_types: Option<Vec<String>>,

    /// Earliest release year.
    #[arg(long)]
    release_year_from: Option<u16>,

    /// Latest release year.
    #[arg(long)]
    release_year_until: Option<u16>,

    /// Minimum price.
    #[arg(long)]
    min_price: Option<f64>,

    /// Maximum price.
    #[arg(long)]
    max_price: Option<f64>,

    /// Only titles currently in cinemas.
    #[arg(long)]
    cinema_release: bool,

    /// Result page.
    #[arg(long)]
    page: Option<u32>,

    /// Results per page.
    #[arg(long)]
    page_size: Option<u32>,
}

/// Arguments for subcommands taking a single id.
#[derive(clap::Args)]
struct IdArgs {
    /// JustWatch id.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `episodes` subcommand.
#[derive(clap::Args)]
struct EpisodesArgs {
    /// JustWatch show id.
    #[arg(long, required = true)]
    id: String,
    /// Page number. Non-numeric values are ignored.
    #[arg(long)]
    page: Option<String>,
}

/// Arguments for the `title` subcommand.
#[derive(clap::Args)]
struct TitleArgs {
    /// Content type (e.g. "movie", "show").
    #[arg(long, required = true)]
    content_type: String,
    /// JustWatch title id.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective client configuration.
    Show,
    /// Write the effective client configuration to the config file.
    Init,
}

/// Replaces `slot` when `value` is set.
fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Comma-separated flag values as a JSON array.
fn list(values: Option<&[String]>) -> Option<Value> {
    values.map(Value::from)
}

/// Builds the search filter from `--options` and the individual flags.
///
/// # Errors
///
/// Returns an error if `--options` is not valid JSON or contains keys
/// outside the canonical filter set.
fn build_search_params(args: &SearchArgs) -> Result<SearchParams> {
    let mut params = if let Some(ref raw) = args.options {
        let value: Value = serde_json::from_str(raw).context("--options is not valid JSON")?;
        SearchParams::try_from(value).context("invalid search options")?
    } else {
        SearchParams::default()
    };

    overlay(&mut params.query, args.query.clone().map(Value::from));
    overlay(&mut params.content_types, list(args.content_types.as_deref()));
    overlay(&mut params.presentation_types, list(args.presentation_types.as_deref()));
    overlay(&mut params.providers, list(args.providers.as_deref()));
    overlay(&mut params.genres, list(args.genres.as_deref()));
    overlay(&mut params.languages, list(args.languages.as_deref()));
    overlay(&mut params.monetization_types, list(args.monetization_types.as_deref()));
    overlay(&mut params.release_year_from, args.release_year_from.map(Value::from));
    overlay(&mut params.release_year_until, args.release_year_until.map(Value::from));
    overlay(&mut params.min_price, args.min_price.map(Value::from));
    overlay(&mut params.max_price, args.max_price.map(Value::from));
    overlay(&mut params.cinema_release, args.cinema_release.then_some(Value::Bool(true)));
    overlay(&mut params.page, args.page.map(Value::from));
    overlay(&mut params.page_size, args.page_size.map(Value::from));

    Ok(params)
}

/// Loads the config file and applies global command-line overrides.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file
/// cannot be parsed.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = resolve_config_path(cli.dir.as_ref())?;
    let config = AppConfig::load(&path)?;
    Ok(config.with_overrides(ClientOverrides {
        locale: cli.locale.clone(),
        proxy: cli.proxy.clone(),
        proxy_type: cli.proxy_type.clone(),
    }))
}

/// Builds the API client from the effective configuration.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the client fails to build.
fn build_client(cli: &Cli) -> Result<JustWatchClient> {
    let config = load_config(cli)?;
    tracing::debug!(locale = %config.client.locale, "Using client configuration");

    let mut builder = JustWatchClient::builder().config(config.client);
    if let Some(ref ua) = cli.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    builder.build().context("failed to build JustWatch client")
}

/// Writes a JSON payload to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
fn print_json(value: &Value) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to write JSON output")?;
    writeln!(out).context("failed to write JSON output")
}

/// Runs an API subcommand and prints its payload.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the search options are
/// invalid, or the API request fails.
#[instrument(skip_all)]
async fn run_api_command(cli: &Cli) -> Result<()> {
    // Validate search options before anything else.
    let search_params = match cli.command {
        Commands::Search(ref args) => Some(build_search_params(args)?),
        _ => None,
    };

    let client = build_client(cli)?;

    let payload = match cli.command {
        Commands::Search(_) => {
            let params = search_params.unwrap_or_default();
            client.search(&params).await.context("search request failed")?
        }
        Commands::Providers => client
            .providers()
            .await
            .context("providers request failed")?,
        Commands::Genres => client.genres().await.context("genres request failed")?,
        Commands::Season(ref args) => client
            .season(&args.id)
            .await
            .context("season request failed")?,
        Commands::Episodes(ref args) => {
            let page = args.page.as_deref().and_then(parse_episode_page);
            if args.page.is_some() && page.is_none() {
                tracing::warn!("Ignoring non-numeric --page value");
            }
            client
                .episodes(&args.id, page)
                .await
                .context("episodes request failed")?
        }
        Commands::Title(ref args) => client
            .title(&args.content_type, &args.id)
            .await
            .context("title request failed")?,
        Commands::Person(ref args) => client
            .person(&args.id)
            .await
            .context("person request failed")?,
        Commands::Config(_) => return Ok(()),
    };

    print_json(&payload)
}

/// Runs the `config` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, rendered or saved.
fn run_config(cli: &Cli, command: &ConfigSubcommands) -> Result<()> {
    let config = load_config(cli)?;
    match command {
        ConfigSubcommands::Show => {
            let mut out = std::io::stdout().lock();
            write!(out, "{}", config.to_toml()?).context("failed to write config output")
        }
        ConfigSubcommands::Init => {
            let path = resolve_config_path(cli.dir.as_ref())?;
            config.save(&path)?;
            tracing::info!("Wrote {}", path.display());
            Ok(())
        }
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Config(ref cmd) => run_config(&cli, &cmd.command),
        _ => run_api_command(&cli).await,
    }
}

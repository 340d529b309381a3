//! vtv - virtual TV channel manager and player.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, AppDirs};
use crate::tui::run_player;
use vtv_core::transfer::{EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
use vtv_core::{
    ChannelDraft, ChannelStore, ChannelType, ValidationResult, export_channels, import_channels,
    parse_tags,
};
use vtv_db::SqliteStorage;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Identity recorded in the change history (default: from config).
    #[arg(long, global = true)]
    user: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Manage channels.
    Channels(ChannelsCommand),
    /// Watch enabled channels in the player TUI.
    Watch,
    /// Show or change configuration.
    Config(ConfigCommand),
}

/// Arguments for the `channels` subcommand.
#[derive(clap::Args)]
struct ChannelsCommand {
    /// Channels subcommand to run.
    #[command(subcommand)]
    command: ChannelsSubcommands,
}

/// Available channels subcommands.
#[derive(Subcommand)]
enum ChannelsSubcommands {
    /// List all channels.
    List,
    /// Add a new channel.
    Add(ChannelFields),
    /// Update an existing channel.
    Update(UpdateArgs),
    /// Delete a channel.
    Delete {
        /// Channel ID.
        id: String,
    },
    /// Show the change history.
    History {
        /// Only show entries for this channel.
        #[arg(long)]
        channel_id: Option<String>,
    },
    /// Import channels from a JSON file.
    Import {
        /// JSON file holding an array of channels.
        file: PathBuf,
    },
    /// Export all channels to a JSON file.
    Export {
        /// Output file.
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },
}

/// Editable channel fields.
///
/// Required fields are optional here so that validation can report every
/// missing field at once.
#[derive(clap::Args)]
struct ChannelFields {
    /// Display name.
    #[arg(long)]
    name: Option<String>,
    /// Media URL.
    #[arg(long)]
    url: Option<String>,
    /// Media kind: youtube or image.
    #[arg(long = "type")]
    channel_type: Option<ChannelType>,
    /// Thumbnail image reference.
    #[arg(long)]
    thumbnail: Option<String>,
    /// Free-text description.
    #[arg(long)]
    description: Option<String>,
    /// Category label.
    #[arg(long)]
    category: Option<String>,
    /// Comma-separated tags (e.g. "news,music").
    #[arg(long)]
    tags: Option<String>,
}

impl ChannelFields {
    /// Overwrites the draft fields that were given on the command line.
    fn apply(self, draft: &mut ChannelDraft) {
        if let Some(name) = self.name {
            draft.name = Some(name);
        }
        if let Some(url) = self.url {
            draft.url = Some(url);
        }
        if let Some(channel_type) = self.channel_type {
            draft.channel_type = Some(channel_type);
        }
        if let Some(thumbnail) = self.thumbnail {
            draft.thumbnail = thumbnail;
        }
        if let Some(description) = self.description {
            draft.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(category) = self.category {
            draft.category = Some(category).filter(|c| !c.is_empty());
        }
        if let Some(tags) = self.tags {
            draft.tags = parse_tags(&tags);
        }
    }
}

/// Arguments for the `channels update` subcommand.
#[derive(clap::Args)]
struct UpdateArgs {
    /// Channel ID.
    id: String,

    /// Fields to change.
    #[command(flatten)]
    fields: ChannelFields,

    /// Offer the channel in the player.
    #[arg(long, conflicts_with = "disable")]
    enable: bool,

    /// Hide the channel from the player.
    #[arg(long)]
    disable: bool,
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
    /// Print the effective configuration.
    Show,
    /// Change configuration values.
    Set {
        /// Identity recorded in the change history.
        #[arg(long)]
        user_id: Option<String>,
        /// Initial player volume (0-100).
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        volume: Option<u8>,
    },
}

/// Opens the channel store backed by the `SQLite` database.
fn open_store(dirs: &AppDirs) -> Result<ChannelStore<SqliteStorage>> {
    let storage = SqliteStorage::open(&dirs.database_file()).context("failed to open database")?;
    Ok(ChannelStore::open(storage))
}

/// Loads the config file.
fn load_config(dirs: &AppDirs) -> Result<AppConfig> {
    AppConfig::load(&dirs.config_file()).context("failed to load config")
}

/// Returns the `--user` override or the configured identity.
fn resolve_user(user: Option<String>, dirs: &AppDirs) -> Result<String> {
    match user {
        Some(u) => Ok(u),
        None => Ok(load_config(dirs)?.user.id),
    }
}

/// Logs every validation message and fails.
fn reject(validation: &ValidationResult) -> Result<()> {
    for error in &validation.errors {
        tracing::error!("{error}");
    }
    bail!("channel validation failed");
}

/// Runs the `channels list` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
#[instrument(skip_all)]
fn run_channels_list(dirs: &AppDirs) -> Result<()> {
    let store = open_store(dirs)?;
    let channels = store.channels();

    if channels.is_empty() {
        tracing::info!("No channels. Run `channels add` or `channels import` first.");
        return Ok(());
    }

    tracing::info!("ID\t\tType\tEnabled\tName\t\t\tURL");
    for ch in channels {
        tracing::info!(
            "{}\t{}\t{}\t{}\t\t{}",
            ch.id,
            ch.channel_type,
            if ch.is_enabled { "yes" } else { "no" },
            ch.name,
            ch.url,
        );
    }
    tracing::info!("Total: {} channels", channels.len());

    Ok(())
}

/// Runs the `channels add` subcommand.
///
/// # Errors
///
/// Returns an error if validation fails or the channel cannot be saved.
#[instrument(skip_all)]
fn run_channels_add(fields: ChannelFields, user: Option<String>, dirs: &AppDirs) -> Result<()> {
    let mut draft = ChannelDraft {
        is_enabled: true,
        ..ChannelDraft::default()
    };
    fields.apply(&mut draft);

    let mut store = open_store(dirs)?;
    let channel = match store.create_channel(draft) {
        Ok(channel) => channel,
        Err(validation) => return reject(&validation),
    };

    let user_id = resolve_user(user, dirs)?;
    let id = channel.id.clone();
    let name = channel.name.clone();
    store
        .add_channel(channel, &user_id)
        .context("failed to add channel")?;

    tracing::info!("Added channel {id}: {name}");
    Ok(())
}

/// Runs the `channels update` subcommand.
///
/// # Errors
///
/// Returns an error if the channel does not exist, validation fails, or the
/// change cannot be saved.
#[instrument(skip_all, fields(channel_id = %args.id))]
fn run_channels_update(args: UpdateArgs, user: Option<String>, dirs: &AppDirs) -> Result<()> {
    let mut store = open_store(dirs)?;
    let Some(existing) = store.find(&args.id) else {
        bail!("channel {} not found", args.id);
    };

    let mut draft = ChannelDraft::from(existing.clone());
    args.fields.apply(&mut draft);
    if args.enable {
        draft.is_enabled = true;
    }
    if args.disable {
        draft.is_enabled = false;
    }

    let channel = match draft.into_channel() {
        Ok(channel) => channel,
        Err(validation) => return reject(&validation),
    };

    let user_id = resolve_user(user, dirs)?;
    store
        .update_channel(channel, &user_id)
        .context("failed to update channel")?;

    tracing::info!("Updated channel {}", args.id);
    Ok(())
}

/// Runs the `channels delete` subcommand.
///
/// # Errors
///
/// Returns an error if the channel does not exist or the change cannot be saved.
#[instrument(skip_all, fields(channel_id = %id))]
fn run_channels_delete(id: &str, user: Option<String>, dirs: &AppDirs) -> Result<()> {
    let mut store = open_store(dirs)?;
    let user_id = resolve_user(user, dirs)?;

    if !store
        .delete_channel(id, &user_id)
        .context("failed to delete channel")?
    {
        bail!("channel {id} not found");
    }

    tracing::info!("Deleted channel {id}");
    Ok(())
}

/// Runs the `channels history` subcommand.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
#[instrument(skip_all)]
fn run_channels_history(channel_id: Option<&str>, dirs: &AppDirs) -> Result<()> {
    let store = open_store(dirs)?;
    let records: Vec<_> = match channel_id {
        Some(id) => store.history_for(id).collect(),
        None => store.history().iter().collect(),
    };

    if records.is_empty() {
        tracing::info!("No history.");
        return Ok(());
    }

    tracing::info!("Timestamp\t\t\tChange\tChannel\t\tUser\tName");
    for r in &records {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            r.timestamp,
            r.change_type,
            r.channel_id,
            r.user_id,
            r.changes.name,
        );
    }
    tracing::info!("Total: {} entries", records.len());

    Ok(())
}

/// Runs the `channels import` subcommand.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is rejected, or cannot be saved.
#[instrument(skip_all, fields(file = %file.display()))]
fn run_channels_import(file: &Path, user: Option<String>, dirs: &AppDirs) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut store = open_store(dirs)?;
    let user_id = resolve_user(user, dirs)?;
    let ids = import_channels(&mut store, &text, &user_id)
        .with_context(|| format!("failed to import {}", file.display()))?;

    tracing::info!("Imported {} channels from {}", ids.len(), file.display());
    Ok(())
}

/// Runs the `channels export` subcommand.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
#[instrument(skip_all, fields(output = %output.display()))]
fn run_channels_export(output: &Path, dirs: &AppDirs) -> Result<()> {
    let store = open_store(dirs)?;
    let json = export_channels(store.channels())?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write {}", output.display()))?;

    tracing::info!(
        mime = EXPORT_MIME_TYPE,
        "Exported {} channels to {}",
        store.channels().len(),
        output.display()
    );
    Ok(())
}

/// Runs the `watch` subcommand.
///
/// # Errors
///
/// Returns an error if config, database, or the TUI fails.
#[instrument(skip_all)]
fn run_watch(dirs: &AppDirs) -> Result<()> {
    let config = load_config(dirs)?;
    let store = open_store(dirs)?;

    run_player(store.channels().to_vec(), config.player.volume).context("player TUI failed")
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read.
fn run_config_show(dirs: &AppDirs) -> Result<()> {
    let config_path = dirs.config_file();
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    tracing::info!("Config file: {}", config_path.display());
    tracing::info!("user.id = {}", config.user.id);
    tracing::info!("player.volume = {}", config.player.volume);
    Ok(())
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
fn run_config_set(user_id: Option<String>, volume: Option<u8>, dirs: &AppDirs) -> Result<()> {
    let config_path = dirs.config_file();
    let mut config = AppConfig::load(&config_path).context("failed to load config")?;

    if let Some(id) = user_id {
        config.user.id = id;
    }
    if let Some(v) = volume {
        config.player.volume = v;
    }

    config.save(&config_path).context("failed to save config")?;
    tracing::info!("Saved {}", config_path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

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
    let app_dirs = AppDirs::resolve(cli.dir.as_deref()).context("failed to resolve directories")?;
    let dirs = &app_dirs;
    match cli.command {
        Commands::Channels(ch) => match ch.command {
            ChannelsSubcommands::List => run_channels_list(dirs),
            ChannelsSubcommands::Add(fields) => run_channels_add(fields, cli.user, dirs),
            ChannelsSubcommands::Update(args) => run_channels_update(args, cli.user, dirs),
            ChannelsSubcommands::Delete { id } => run_channels_delete(&id, cli.user, dirs),
            ChannelsSubcommands::History { channel_id } => {
                run_channels_history(channel_id.as_deref(), dirs)
            }
            ChannelsSubcommands::Import { file } => run_channels_import(&file, cli.user, dirs),
            ChannelsSubcommands::Export { output } => run_channels_export(&output, dirs),
        },
        Commands::Watch => run_watch(dirs),
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Show => run_config_show(dirs),
            ConfigSubcommands::Set { user_id, volume } => run_config_set(user_id, volume, dirs),
        },
    }
}

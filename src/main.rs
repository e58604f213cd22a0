use clap::{Args, Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use herald_bot::application::config::{ConfigResolver, ConfigTree, Scope, SettingsStore};
use herald_bot::application::errors::{BotError, ConfigError, StorageError};
use herald_bot::application::messaging::{run_event_loop, EventDispatcher, SentMessageLedger};
use herald_bot::domain::traits::{ConfigStore, Transport};
use herald_bot::infrastructure::adapters::ConsoleTransport;
use herald_bot::infrastructure::config::AppConfig;
use herald_bot::infrastructure::storage::JsonConfigStore;
use herald_bot::plugins::{Plugin, PluginLoader};

#[derive(Parser)]
#[command(name = "herald-bot")]
#[command(
    about = "A plugin-driven chat bot that keeps its replies in step with edits",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides the data file and BOT_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Write a default config and data file
    InitConfig,
    /// Enable a plugin for a guild, a channel, or everywhere
    Enable {
        plugin: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
    /// Disable a plugin for a guild, a channel, or everywhere
    Disable {
        plugin: String,
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[derive(Args)]
struct ScopeArgs {
    /// Guild id
    #[arg(long, conflicts_with = "channel")]
    guild: Option<String>,

    /// Channel id
    #[arg(long)]
    channel: Option<String>,
}

impl ScopeArgs {
    fn scope(&self) -> Scope {
        match (&self.guild, &self.channel) {
            (Some(guild), _) => Scope::Guild(guild.clone()),
            (None, Some(channel)) => Scope::Channel(channel.clone()),
            (None, None) => Scope::Defaults,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let (config, config_error) = load_config(&cli.config);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    if let Some(e) = config_error {
        tracing::warn!("Failed to load config: {}, using defaults", e);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => rt.block_on(run_bot(config, cli.token)),
        Commands::Version => {
            println!("herald-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => rt.block_on(init_config(&cli.config, &config)),
        Commands::Enable { plugin, scope } => {
            rt.block_on(set_plugin(&config, &plugin, scope.scope(), true))
        }
        Commands::Disable { plugin, scope } => {
            rt.block_on(set_plugin(&config, &plugin, scope.scope(), false))
        }
    };

    // A console read parked on the blocking pool must not keep the process alive
    rt.shutdown_timeout(Duration::from_millis(500));

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Load the YAML config if present, falling back to defaults plus env
fn load_config(path: &str) -> (AppConfig, Option<ConfigError>) {
    if !Path::new(path).exists() {
        return (AppConfig::load_env(), None);
    }
    match AppConfig::load(path) {
        Ok(mut config) => {
            config.apply_env();
            (config, None)
        }
        Err(e) => (AppConfig::load_env(), Some(e)),
    }
}

async fn run_bot(config: AppConfig, token_override: Option<String>) -> Result<(), BotError> {
    tracing::info!("Starting {}", config.bot.name);

    let persistence = Arc::new(JsonConfigStore::new(&config.bot.data_file));
    let settings = Arc::new(SettingsStore::load(persistence).await?);

    if let Some(token) = token_override.or_else(|| std::env::var("BOT_TOKEN").ok()) {
        settings.set_token(token).await;
    }
    // Without a token the bot cannot operate
    settings.require_token().await?;

    let registry = PluginLoader::with_builtins().load(&config.plugins.load)?;
    tracing::info!("Plugins in dispatch order: {}", registry.names().join(", "));
    for plugin in registry.iter() {
        tracing::debug!("  {} - {}", plugin.name(), plugin.description());
    }

    if !config.adapters.console.enabled {
        return Err(ConfigError::InvalidValue("no adapter enabled".to_string()).into());
    }
    let transport = Arc::new(ConsoleTransport::new(
        config.bot.name.clone(),
        config.adapters.console.channel(),
    ));
    tracing::info!("Bot started: @{}", transport.bot_info().username);

    let dispatcher = Arc::new(EventDispatcher::new(
        Arc::new(registry),
        ConfigResolver::new(settings),
        transport.clone(),
        Arc::new(SentMessageLedger::new()),
    ));

    let (tx, rx) = mpsc::channel(64);
    let mut listener = {
        let transport = transport.clone();
        tokio::spawn(async move { transport.start(tx).await })
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let handled = run_event_loop(dispatcher, rx, shutdown).await;
    tracing::info!("Handled {} event(s)", handled);

    // The event receiver is gone, so the transport winds down on its own
    match tokio::time::timeout(Duration::from_millis(500), &mut listener).await {
        Ok(joined) => {
            joined.map_err(|e| BotError::Internal(format!("Transport task failed: {}", e)))??
        }
        Err(_) => {
            tracing::warn!("Transport did not stop in time, aborting it");
            listener.abort();
        }
    }
    Ok(())
}

async fn init_config(config_path: &str, config: &AppConfig) -> Result<(), BotError> {
    if Path::new(config_path).exists() {
        println!("{} already exists, leaving it untouched", config_path);
    } else {
        std::fs::write(config_path, AppConfig::default().to_yaml()?).map_err(StorageError::from)?;
        println!("Wrote {}", config_path);
    }

    let store = JsonConfigStore::new(&config.bot.data_file);
    if store.path().exists() {
        println!("{} already exists, leaving it untouched", store.path().display());
        return Ok(());
    }

    let mut tree = ConfigTree {
        token: Some(String::new()),
        ..ConfigTree::default()
    };
    for plugin in &config.plugins.load {
        tree.set_plugin_enabled(&Scope::Defaults, plugin, true);
    }
    store.save(&tree).await?;
    println!("Wrote {}, set \"token\" before running", store.path().display());
    Ok(())
}

async fn set_plugin(
    config: &AppConfig,
    plugin: &str,
    scope: Scope,
    enabled: bool,
) -> Result<(), BotError> {
    let persistence = Arc::new(JsonConfigStore::new(&config.bot.data_file));
    let settings = match SettingsStore::load(persistence.clone()).await {
        Ok(settings) => settings,
        Err(StorageError::NotFound(path)) => {
            tracing::info!("{} does not exist yet, creating it", path);
            SettingsStore::new(persistence, ConfigTree::default())
        }
        Err(e) => return Err(e.into()),
    };

    let known = PluginLoader::with_builtins().available();
    if !known.iter().any(|name| name == plugin) {
        tracing::warn!("'{}' is not a known plugin (known: {})", plugin, known.join(", "));
    }

    settings.set_plugin_enabled(&scope, plugin, enabled).await;
    settings.save().await?;
    Ok(())
}

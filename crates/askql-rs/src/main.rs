//! askql server binary.

use anyhow::Context;
use askql_rs::config::{AskqlConfig, LayeredConfigOptions};
use askql_rs::core::{Analyst, AnalystSettings};
use askql_rs::engine::build_engine;
use askql_rs::server;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// Command-line options for the askql server.
#[derive(Debug, Parser)]
#[command(name = "askql", version, about = "Ask questions of a SQL database over HTTP")]
struct Cli {
    /// Extra askql.json5 applied over the discovered config layers
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to bind the HTTP server to (host:port)
    #[arg(long, env = "ASKQL_BIND")]
    bind: Option<String>,
    /// SQLite database file to query
    #[arg(long, env = "ASKQL_DATABASE_PATH")]
    database_path: Option<String>,
    /// Model name forwarded to the generation service
    #[arg(long, env = "ASKQL_MODEL")]
    model: Option<String>,
    /// Directory with the web frontend
    #[arg(long)]
    static_dir: Option<String>,
}

impl Cli {
    /// Apply flag and environment overrides on top of loaded config.
    fn apply(&self, config: &mut AskqlConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(path) = &self.database_path {
            config.database.path = Some(path.clone());
        }
        if let Some(model) = &self.model {
            config.engine.model = Some(model.clone());
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    askql_rs::init_logging();

    let cli = Cli::parse();
    info!(
        "starting askql (config_set={}, bind_set={}, database_set={})",
        cli.config.is_some(),
        cli.bind.is_some(),
        cli.database_path.is_some()
    );

    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = &cli.config {
        options = options.with_runtime_path(path);
    }
    let layered =
        AskqlConfig::load_layered_with_options(options).context("failed to load config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    let mut config = layered.config;
    cli.apply(&mut config);
    config.validate().context("invalid config")?;

    let engine = build_engine(&config).context("failed to build engine")?;
    let analyst = Analyst::new(engine, AnalystSettings::from(&config.display));
    let app = server::router(
        analyst,
        config.server.static_dir.as_deref().map(std::path::Path::new),
    );
    let addr = config.server.socket_addr().context("invalid bind address")?;
    server::serve(app, addr).await.context("server failed")?;
    Ok(())
}

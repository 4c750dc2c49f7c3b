//! Resume Portal route tool
//!
//! Inspect and validate the application's route table:
//! - List declared routes
//! - Check the table and configuration for errors
//! - Resolve paths to the page that would render
//! - Print a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use resume_portal::{
    app_routes, generate_default_config, AppConfig, AppRoot, Location, LoggingConfig,
    NoopAnimations,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "resume-portal-routes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and validate the Resume Portal route table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List declared routes in evaluation order
    List,

    /// Validate configuration and route table
    Check,

    /// Show which page renders for each path
    Resolve {
        /// Paths or hrefs, e.g. /upload or /resume?tab=skills
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("resume_portal={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Stderr subscriber used while the config, and so the logging settings,
/// are still being loaded
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "resume_portal=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(AppConfig::load_default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        load_config(cli.config.as_ref())
    })?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::List => {
            let table = app_routes()?;
            println!("{:<4} {:<16} {}", "#", "PATTERN", "PAGE");
            for (i, entry) in table.entries().iter().enumerate() {
                let pattern = entry
                    .pattern
                    .as_ref()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_else(|| "(fallback)".to_string());
                println!("{:<4} {:<16} {}", i + 1, pattern, entry.view);
            }
        }

        Commands::Check => {
            AppRoot::new(config).context("application root failed to initialize")?;
            println!("OK: configuration and route table are valid");
        }

        Commands::Resolve { paths } => {
            let root = AppRoot::new(config).context("application root failed to initialize")?;
            let mut app = root.mount(Box::new(NoopAnimations));

            for path in paths {
                let location = Location::parse(&path);
                let tree = app.render(&location);
                match tree.fallback_text() {
                    Some(text) => println!("{} -> {} ({})", location, tree.page, text),
                    None => {
                        let params: Vec<String> =
                            tree.params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                        if params.is_empty() {
                            println!("{} -> {}", location, tree.page);
                        } else {
                            println!("{} -> {} [{}]", location, tree.page, params.join(", "));
                        }
                    }
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!("Wrote default config to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

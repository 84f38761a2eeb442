use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinevault_core::media::{MediaKind, TimeWindow, TrendingKind};
use cinevault_core::{AppConfig, CarouselLayout};

mod commands;

#[derive(Parser)]
#[command(name = "cinevault")]
#[command(author, version, about = "A terminal browser for trending movies and TV series")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI
    Run(RunArgs),
    /// Print the trending list
    Trending {
        /// all, movie or tv (defaults to tmdb.trending_kind)
        #[arg(short, long)]
        kind: Option<TrendingKind>,
        /// day or week (defaults to tmdb.time_window)
        #[arg(short, long)]
        window: Option<TimeWindow>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one title with its cast and watch providers
    Detail {
        /// TMDB id
        id: u64,
        /// movie or tv; tried in that order when omitted
        #[arg(short, long)]
        kind: Option<MediaKind>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the authenticated TMDB proxy
    Proxy {
        /// Listen address (defaults to proxy.bind_addr)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Wrap around endlessly instead of stopping at the ends
    #[arg(long)]
    infinite: bool,
    /// Show titles as a vertical list
    #[arg(long)]
    vertical: bool,
    /// all, movie or tv
    #[arg(short, long)]
    kind: Option<TrendingKind>,
    /// day or week
    #[arg(short, long)]
    window: Option<TimeWindow>,
}

impl RunArgs {
    fn apply(self, config: &mut AppConfig) {
        if self.infinite {
            config.ui.carousel.infinite = true;
        }
        if self.vertical {
            config.ui.carousel.layout = CarouselLayout::Vertical;
        }
        if let Some(kind) = self.kind {
            config.tmdb.trending_kind = kind;
        }
        if let Some(window) = self.window {
            config.tmdb.time_window = window;
        }
    }
}

/// Initialize logging. The TUI owns the terminal, so it logs to a file.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    if to_file {
        let log_path = config.log_path();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;

    let is_tui = matches!(cli.command, Some(Commands::Run(_)) | None);
    init_logging(&config, is_tui)?;

    match cli.command {
        Some(Commands::Run(args)) => {
            args.apply(&mut config);
            commands::run::run(Arc::new(config)).await
        }
        None => commands::run::run(Arc::new(config)).await,
        Some(Commands::Trending { kind, window, json }) => {
            let kind = kind.unwrap_or(config.tmdb.trending_kind);
            let window = window.unwrap_or(config.tmdb.time_window);
            commands::trending::run(&config, kind, window, json).await
        }
        Some(Commands::Detail { id, kind, json }) => {
            commands::detail::run(&config, id, kind, json).await
        }
        Some(Commands::Proxy { bind }) => commands::proxy::run(&config, bind).await,
    }
}

mod dictionary;
mod images;
mod lookup;
mod render;
mod theme;

pub const USER_AGENT: &str = concat!("wordlens/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use tracing::warn;

use lookup::{DEFAULT_MAX_IMAGES, Lookup, LookupConfig};
use theme::Theme;

/// Look up a word: definitions, phonetics, pronunciation audio, and
/// illustrative photos.
#[derive(Parser)]
#[command(name = "wordlens", version, about)]
struct Cli {
    /// Word to look up (sent to the dictionary exactly as typed)
    word: String,

    /// Maximum number of illustrative photos to show
    #[arg(long, default_value_t = DEFAULT_MAX_IMAGES as u8,
          value_parser = clap::value_parser!(u8).range(1..=6))]
    max_images: u8,

    /// Skip the photo search even when an API key is configured
    #[arg(long)]
    no_images: bool,

    /// Fail the whole lookup when the photo search fails
    #[arg(long)]
    require_images: bool,

    /// Set and persist the colour theme for this and future runs
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Flip the persisted colour theme, then look the word up
    #[arg(long, conflicts_with = "theme")]
    toggle_theme: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wordlens=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let active_theme = resolve_theme(&cli);

    let mut config = LookupConfig::from_env();
    config.max_images = cli.max_images as usize;
    config.require_images = cli.require_images;
    if cli.no_images {
        config.image_api_key = None;
    } else if config.image_api_key.is_none() {
        warn!("PIXABAY_API_KEY not set; continuing without images");
    }

    let lookup = Lookup::new(reqwest::Client::new(), &config);
    let result = lookup.lookup(&cli.word).await;

    match result.outcome {
        Ok(report) => {
            print!("{}", render::format_report(&report, active_theme));
            Ok(())
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}

/// `--theme` wins and persists; `--toggle-theme` flips the stored value and
/// persists; otherwise the stored/env/default resolution applies. Failure to
/// persist is never fatal.
fn resolve_theme(cli: &Cli) -> Theme {
    let path = theme::preference_path();

    let chosen = if let Some(choice) = cli.theme {
        choice
    } else {
        let current = theme::load(path.as_deref());
        if cli.toggle_theme {
            current.toggled()
        } else {
            return current;
        }
    };

    if let Some(path) = &path
        && let Err(e) = theme::store(path, chosen)
    {
        warn!(error = %e, "could not persist theme preference");
    }
    chosen
}

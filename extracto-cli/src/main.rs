use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use extracto_core::Period;
use extracto_finance::clean_description;
use extracto_ingest::{TextExtractor, TracingSink, lookup_period};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod extract;
mod output;
mod state;

use config::Config;
use extract::Extractor;
use output::Format;

#[derive(Parser, Debug)]
#[command(
    name = "extracto",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("EXTRACTO_BUILD_SHA"), ")"),
    about = "Reconstruct transactions from Banregio account statements"
)]
struct Cli {
    /// More logging on stderr (-v info, -vv debug). EXTRACTO_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct the transactions of a statement (PDF or extracted text)
    Parse {
        file: PathBuf,

        /// Statement month as YYYY-MM (skips period detection)
        #[arg(long)]
        period: Option<Period>,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Identifier echoed in the report (default: the file name)
        #[arg(long)]
        source_id: Option<String>,

        /// Direction rules TOML, instead of [rules].direction_rules
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Print the statement period detected in a document
    Period { file: PathBuf },

    /// Show how a single description is classified
    Classify {
        description: String,

        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Manage ~/.extracto/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config (no-op if one exists)
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Parse {
            file,
            period,
            format,
            source_id,
            rules,
        } => {
            let cfg = config::load_config()?;
            let engine = cfg.engine(rules.as_deref())?;
            let source_id = source_id.unwrap_or_else(|| display_name(&file));

            let document = read_document(&file)?;
            let extractor = Extractor::for_document(&file, &document, &cfg.extract)?;
            let report = engine
                .process_document(&extractor, &source_id, &document, period, &mut TracingSink)
                .await?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            output::write_report(&mut out, &report, format)?;
            out.flush()?;
        }

        Command::Period { file } => {
            let cfg = config::load_config()?;
            let text = document_text(&file, &cfg).await?;
            let lookup = lookup_period(&text);
            if lookup.is_fallback() {
                println!("{} (fallback: no period found)", lookup.period);
            } else {
                println!("{}", lookup.period);
            }
        }

        Command::Classify { description, rules } => {
            let cfg = config::load_config()?;
            let engine = cfg.engine(rules.as_deref())?;
            let c = engine.direction_rules().classify_detailed(&description);
            println!("direction: {}", c.direction);
            println!("rule:      {}", c.rule_id.as_deref().unwrap_or("(default)"));
            println!("category:  {}", engine.category_rules().categorize(&description));
            println!("summary:   {}", clean_description(&description));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("EXTRACTO_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_document(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read {}", path.display()))
}

async fn document_text(path: &Path, cfg: &Config) -> Result<String> {
    let document = read_document(path)?;
    let extractor = Extractor::for_document(path, &document, &cfg.extract)?;
    extractor
        .extract_text(&document)
        .await
        .with_context(|| format!("extracting text from {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

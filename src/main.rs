#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use dashgen::config::GeneratorConfig;
use dashgen::generator::{load_definition, prepare};
use dashgen::writer::write_dashboard;

#[derive(Parser, Debug)]
#[command(name = "dashgen", version, about = "Generate dashboard JSON from a definition file")]
struct Cli {
    /// JSON generator config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a definition and write the dashboard document
    Generate {
        definition: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(long)]
        no_auto_panel_ids: bool,

        #[arg(long)]
        no_auto_ref_ids: bool,

        /// Leave `#<refId>` references unexpanded
        #[arg(long)]
        no_resolve: bool,
    },
    /// Load and normalize a definition without writing anything
    Check { definition: PathBuf },
}

fn run(cli: Cli, mut config: GeneratorConfig) -> Result<()> {
    match cli.command {
        Command::Generate {
            definition,
            output,
            no_auto_panel_ids,
            no_auto_ref_ids,
            no_resolve,
        } => {
            config.auto_panel_ids &= !no_auto_panel_ids;
            config.auto_ref_ids &= !no_auto_ref_ids;
            config.resolve_expressions &= !no_resolve;

            let dashboard = prepare(load_definition(&definition)?, &config)
                .with_context(|| format!("Failed to normalize {:?}", definition))?;

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create output file {:?}", path))?;
                    write_dashboard(&dashboard, BufWriter::new(file))?;
                    info!(path = %path.display(), "Wrote dashboard");
                }
                None => write_dashboard(&dashboard, io::stdout().lock())?,
            }
        }
        Command::Check { definition } => {
            let dashboard = prepare(load_definition(&definition)?, &config)
                .with_context(|| format!("Failed to normalize {:?}", definition))?;
            info!(title = %dashboard.title, "Definition is valid");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = GeneratorConfig::resolve(cli.config.as_deref())?;

    // Logs go to stderr so stdout stays a clean document
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.trace_level())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(config = ?config, "starting dashgen");
    run(cli, config).inspect_err(|err| error!("generation failed: err={err:#}"))?;
    Ok(())
}

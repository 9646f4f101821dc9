//! Extract command - run field extraction over recognized text files.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use idcr_core::card::CardParser;

use super::load_config;
use super::process::{OutputFormat, format_fields};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text recognized from the front face
    #[arg(long, required = true)]
    front_text: PathBuf,

    /// Text recognized from the back face
    #[arg(long, required = true)]
    back_text: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Reject text that does not look like an identity card
    #[arg(long)]
    require_document_match: bool,

    /// Print one line per field that could not be extracted
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let front = fs::read_to_string(&args.front_text)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", args.front_text.display(), e))?;
    let back = fs::read_to_string(&args.back_text)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", args.back_text.display(), e))?;

    let parser = CardParser::new().with_document_check(
        args.require_document_match || config.extraction.require_document_match,
    );
    let result = parser.parse(&front, &back)?;

    println!("{}", format_fields(&result.record, args.format)?);

    if args.show_warnings {
        for warning in &result.warnings {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
    }

    Ok(())
}

//! Process command - extract fields from the two images of one card.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use idcr_core::card::CardParser;
use idcr_core::models::config::IdcrConfig;
use idcr_core::models::record::{CardRecord, ExtractedRecord, Face};
use idcr_core::ocr::create_backend;
use idcr_core::service::CardService;
use idcr_core::store::{MemoryRecordStore, RecordStore, open_store};
use idcr_core::upload::UploadedImage;

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Front face image (JPEG or PNG)
    #[arg(required = true)]
    front: PathBuf,

    /// Back face image (JPEG or PNG)
    #[arg(required = true)]
    back: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Reject images that do not look like an identity card
    #[arg(long)]
    require_document_match: bool,

    /// Persist the record to the configured database
    #[arg(long)]
    save: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    let front = UploadedImage::from_path(Face::Front, &args.front)?;
    let back = UploadedImage::from_path(Face::Back, &args.back)?;

    // Reject bad inputs before loading any models
    front.validate(Face::Front, &config.upload)?;
    back.validate(Face::Back, &config.upload)?;

    info!(
        "Processing card: {} / {}",
        args.front.display(),
        args.back.display()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );

    pb.set_message("Loading OCR engine...");
    let service = build_service(&config, args.require_document_match, args.save)?;

    pb.set_message("Recognizing front and back images...");
    let record = service.process(&front, &back)?;

    pb.finish_and_clear();

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    let missing = record.fields.missing_fields();
    if !missing.is_empty() {
        eprintln!(
            "{} Not found: {}",
            style("!").yellow(),
            missing.join(", ")
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Wire the OCR backend, parser and store selected by `config`.
pub(crate) fn build_service(
    config: &IdcrConfig,
    require_document_match: bool,
    save: bool,
) -> anyhow::Result<CardService> {
    let backend = create_backend(&config.ocr).map_err(|e| {
        anyhow::anyhow!(
            "Failed to start OCR engine: {}\n\n\
             Place det.onnx, latin_rec.onnx and latin_dict.txt in {} or pass --model-dir.",
            e,
            config.ocr.model_dir.display()
        )
    })?;

    let parser = CardParser::new()
        .with_document_check(require_document_match || config.extraction.require_document_match);

    let store: Arc<dyn RecordStore> = if save {
        open_store(&config.storage)
    } else {
        Arc::new(MemoryRecordStore::new())
    };

    Ok(CardService::new(backend, parser, store).with_upload_limits(config.upload.clone()))
}

pub(crate) fn format_record(record: &CardRecord, format: OutputFormat) -> anyhow::Result<String> {
    let mut columns = vec![
        ("id", record.id.to_string()),
        ("createdAt", record.created_at.to_rfc3339()),
    ];
    columns.extend(field_columns(&record.fields));

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(&columns),
        OutputFormat::Text => Ok(format_text(&columns)),
    }
}

pub(crate) fn format_fields(fields: &ExtractedRecord, format: OutputFormat) -> anyhow::Result<String> {
    let columns = field_columns(fields);

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(&columns),
        OutputFormat::Text => Ok(format_text(&columns)),
    }
}

fn field_columns(fields: &ExtractedRecord) -> Vec<(&'static str, String)> {
    fields
        .fields()
        .into_iter()
        .map(|(name, field)| (name, field.as_str().to_string()))
        .collect()
}

fn format_csv(columns: &[(&'static str, String)]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(columns.iter().map(|(name, _)| *name))?;
    wtr.write_record(columns.iter().map(|(_, value)| value.as_str()))?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(columns: &[(&'static str, String)]) -> String {
    let width = columns.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    columns
        .iter()
        .map(|(name, value)| format!("{:<width$}  {}", name, value, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use idcr_core::models::record::Field;

    fn fields() -> ExtractedRecord {
        ExtractedRecord {
            name: Field::Found("Rajeev Kumar".to_string()),
            address: Field::Found("12 MG Road, City".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_fields_csv() {
        let output = format_fields(&fields(), OutputFormat::Csv).unwrap();
        let mut lines = output.lines();

        assert_eq!(
            lines.next(),
            Some("name,idNumber,dateOfBirth,address,gender,postalCode")
        );
        assert_eq!(
            lines.next(),
            Some("Rajeev Kumar,Not found,Not found,\"12 MG Road, City\",Not found,Not found")
        );
    }

    #[test]
    fn test_format_record_text() {
        let record = CardRecord::new(fields());
        let output = format_record(&record, OutputFormat::Text).unwrap();

        assert!(output.starts_with(&format!("id           {}", record.id)));
        assert!(output.contains("name         Rajeev Kumar"));
        assert!(output.contains("postalCode   Not found"));
    }

    #[test]
    fn test_format_record_json() {
        let record = CardRecord::new(fields());
        let output = format_record(&record, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["name"], "Rajeev Kumar");
        assert_eq!(value["gender"], "Not found");
        assert_eq!(value["id"], record.id.to_string());
    }
}

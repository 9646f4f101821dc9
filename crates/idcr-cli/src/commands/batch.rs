//! Batch processing command for directories of card images.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use idcr_core::models::record::{CardRecord, Face};
use idcr_core::upload::UploadedImage;

use super::load_config;
use super::process::{OutputFormat, build_service, format_record};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Directory containing `*front*` / `*back*` image pairs
    #[arg(required = true)]
    input_dir: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each card
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Reject images that do not look like an identity card
    #[arg(long)]
    require_document_match: bool,

    /// Persist records to the configured database
    #[arg(long)]
    save: bool,
}

/// Front and back images sharing a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPair {
    pub key: String,
    pub front: PathBuf,
    pub back: PathBuf,
}

/// Result of processing a single pair.
struct PairResult {
    pair: CardPair,
    record: Option<CardRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    if !args.input_dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.input_dir.display());
    }

    let pattern = args.input_dir.join("*");
    let files: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
        .filter_map(|r| r.ok())
        .filter(|p| is_image(p))
        .collect();

    let (pairs, unpaired) = pair_images(&files);

    for path in &unpaired {
        warn!("No matching front/back image for {}", path.display());
    }

    if pairs.is_empty() {
        anyhow::bail!(
            "No front/back image pairs found in {}",
            args.input_dir.display()
        );
    }

    println!(
        "{} Found {} cards to process",
        style("ℹ").blue(),
        pairs.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let service = build_service(&config, args.require_document_match, args.save)?;

    let overall_pb = ProgressBar::new(pairs.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cards")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let pair_start = Instant::now();

        let result = UploadedImage::from_path(Face::Front, &pair.front)
            .and_then(|front| Ok((front, UploadedImage::from_path(Face::Back, &pair.back)?)))
            .map_err(idcr_core::IdcrError::from)
            .and_then(|(front, back)| service.process(&front, &back));

        let processing_time_ms = pair_start.elapsed().as_millis() as u64;

        match result {
            Ok(record) => results.push(PairResult {
                pair,
                record: Some(record),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", pair.key, error_msg);
                    results.push(PairResult {
                        pair,
                        record: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", pair.key, error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &successful {
        match (&result.record, &args.output_dir) {
            (Some(record), Some(output_dir)) => {
                let output_path = output_dir.join(format!(
                    "{}.{}",
                    output_name(&result.pair),
                    args.format.extension()
                ));
                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
            (Some(record), None) => println!("{}", format_record(record, args.format)?),
            _ => {}
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} cards in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed cards:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                output_name(&result.pair),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn is_image(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg")
}

fn output_name(pair: &CardPair) -> &str {
    if pair.key.is_empty() { "card" } else { &pair.key }
}

/// Split a file stem into its face and the shared card name.
///
/// `card1_front` and `card1-back` both name card `card1`.
fn face_and_key(path: &Path) -> Option<(Face, String)> {
    let stem = path.file_stem()?.to_str()?.to_lowercase();

    let (face, word) = if stem.contains("front") {
        (Face::Front, "front")
    } else if stem.contains("back") {
        (Face::Back, "back")
    } else {
        return None;
    };

    let key = stem
        .replacen(word, "", 1)
        .trim_matches(|c: char| matches!(c, '_' | '-' | '.' | ' '))
        .to_string();

    Some((face, key))
}

/// Pair front and back images by shared name, sorted by name.
///
/// Returns the pairs and every file left without a partner.
pub fn pair_images(files: &[PathBuf]) -> (Vec<CardPair>, Vec<PathBuf>) {
    let mut fronts: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut backs: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut unpaired = Vec::new();

    for path in files {
        match face_and_key(path) {
            Some((Face::Front, key)) if !fronts.contains_key(&key) => {
                fronts.insert(key, path.clone());
            }
            Some((Face::Back, key)) if !backs.contains_key(&key) => {
                backs.insert(key, path.clone());
            }
            _ => unpaired.push(path.clone()),
        }
    }

    let mut pairs = Vec::new();
    for (key, front) in fronts {
        match backs.remove(&key) {
            Some(back) => pairs.push(CardPair { key, front, back }),
            None => unpaired.push(front),
        }
    }
    unpaired.extend(backs.into_values());

    (pairs, unpaired)
}

fn write_summary(path: &Path, results: &[PairResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "card",
        "front",
        "back",
        "status",
        "id",
        "name",
        "idNumber",
        "dateOfBirth",
        "address",
        "gender",
        "postalCode",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let mut row = vec![
            output_name(&result.pair).to_string(),
            result.pair.front.display().to_string(),
            result.pair.back.display().to_string(),
        ];

        match &result.record {
            Some(record) => {
                row.push("success".to_string());
                row.push(record.id.to_string());
                row.extend(
                    record
                        .fields
                        .fields()
                        .into_iter()
                        .map(|(_, field)| field.as_str().to_string()),
                );
            }
            None => {
                row.push("failed".to_string());
                row.extend(std::iter::repeat_n(String::new(), 7));
            }
        }

        row.push(result.processing_time_ms.to_string());
        row.push(result.error.clone().unwrap_or_default());

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_and_key() {
        assert_eq!(
            face_and_key(Path::new("dir/card1_front.jpg")),
            Some((Face::Front, "card1".to_string()))
        );
        assert_eq!(
            face_and_key(Path::new("dir/Card1-BACK.png")),
            Some((Face::Back, "card1".to_string()))
        );
        assert_eq!(
            face_and_key(Path::new("front.jpg")),
            Some((Face::Front, String::new()))
        );
        assert_eq!(face_and_key(Path::new("selfie.jpg")), None);
    }

    #[test]
    fn test_pair_images() {
        let files: Vec<PathBuf> = [
            "in/b_front.jpg",
            "in/a_back.png",
            "in/a_front.jpg",
            "in/b_back.jpg",
            "in/c_front.png",
            "in/notes.png",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();

        let (pairs, unpaired) = pair_images(&files);

        assert_eq!(
            pairs,
            vec![
                CardPair {
                    key: "a".to_string(),
                    front: PathBuf::from("in/a_front.jpg"),
                    back: PathBuf::from("in/a_back.png"),
                },
                CardPair {
                    key: "b".to_string(),
                    front: PathBuf::from("in/b_front.jpg"),
                    back: PathBuf::from("in/b_back.jpg"),
                },
            ]
        );
        assert_eq!(
            unpaired,
            vec![PathBuf::from("in/notes.png"), PathBuf::from("in/c_front.png")]
        );
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("a.JPG")));
        assert!(is_image(Path::new("a.png")));
        assert!(!is_image(Path::new("a.gif")));
        assert!(!is_image(Path::new("a")));
    }
}
